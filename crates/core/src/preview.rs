//! Preview gating for premium case assets.
//!
//! Non-premium learners get a bounded preview of video and document assets:
//! a fixed number of playback seconds, or a fixed number of document pages,
//! after which the asset blurs behind an upsell overlay. Two small state
//! machines consume progress events from the host viewers and tell them when
//! to pause playback, clamp the page cursor, or lift the overlay.
//!
//! Responsibilities:
//! - Decide `blurred` / `overlay_visible` for every progress event.
//! - Issue host directives on breach (force pause, exit full window) and on
//!   restart (resume).
//! - Keep the sticky breach flags that hold the overlay up after a breach.
//!
//! Notes:
//! - Entitlement is injected per call; the gates never consult global state.
//! - Limits arrive as a [`PreviewLimits`] resolved once at startup.

use serde::{Deserialize, Serialize};

/// Seconds of video playback a gated viewer may watch.
pub const DEFAULT_VIDEO_PREVIEW_SECONDS: f64 = 30.0;

/// Document pages a gated viewer may open.
pub const DEFAULT_DOCUMENT_PREVIEW_PAGES: u32 = 4;

// ============================================================================
// Shared inputs and decision
// ============================================================================

/// Entitlement inputs for one viewer, supplied by the subscription and
/// identity services.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Active premium subscription.
    pub premium: bool,

    /// This case is the first the learner has ever played.
    pub first_case: bool,
}

impl Viewer {
    /// Whether this viewer is exempt from gating altogether.
    pub fn bypasses_gate(&self) -> bool {
        self.premium || self.first_case
    }
}

/// Preview window sizes, resolved once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviewLimits {
    /// Playback seconds before a video breaches.
    pub video_seconds: f64,

    /// Highest document page a gated viewer may rest on.
    pub document_pages: u32,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            video_seconds: DEFAULT_VIDEO_PREVIEW_SECONDS,
            document_pages: DEFAULT_DOCUMENT_PREVIEW_PAGES,
        }
    }
}

/// What the host viewer should render right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PreviewDecision {
    /// Blur the asset content.
    pub blurred: bool,

    /// Show the upsell overlay.
    pub overlay_visible: bool,
}

fn decide(restricted: bool) -> PreviewDecision {
    PreviewDecision {
        blurred: restricted,
        overlay_visible: restricted,
    }
}

// ============================================================================
// Video gate
// ============================================================================

/// Host-side action the video gate requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoDirective {
    /// Pause the playback source immediately.
    ForcePause,
    /// Leave any exclusive full-window presentation so the overlay shows.
    ExitFullWindow,
    /// Resume playback from the start.
    Resume,
}

/// Outcome of one video progress event or restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VideoGateUpdate {
    pub decision: PreviewDecision,

    /// This event crossed the limit; directives fire on this update only.
    pub just_breached: bool,

    pub directives: Vec<VideoDirective>,
}

/// Time-windowed gate over continuous playback.
///
/// Breach is one-directional: once elapsed time reaches the limit the gate
/// stays breached through later, lower readings until [`VideoGate::restart`].
#[derive(Clone, Debug)]
pub struct VideoGate {
    limits: PreviewLimits,
    elapsed_secs: f64,
    breached: bool,
    paused: bool,
}

impl VideoGate {
    /// Creates a gate at zero elapsed playback.
    pub fn new(limits: PreviewLimits) -> Self {
        Self {
            limits,
            elapsed_secs: 0.0,
            breached: false,
            paused: false,
        }
    }

    /// Feeds one elapsed-time report from the playback source.
    ///
    /// Crossing the limit pauses playback and exits any full-window mode via
    /// the returned directives, exactly once per breach. Exempt viewers are
    /// never breached, whatever the elapsed time.
    pub fn observe(&mut self, elapsed_secs: f64, viewer: &Viewer) -> VideoGateUpdate {
        self.elapsed_secs = elapsed_secs;

        if viewer.bypasses_gate() {
            return VideoGateUpdate {
                decision: decide(false),
                just_breached: false,
                directives: Vec::new(),
            };
        }

        let just_breached = !self.breached && elapsed_secs >= self.limits.video_seconds;
        if just_breached {
            self.breached = true;
            self.paused = true;
            tracing::debug!(
                elapsed_secs,
                limit = self.limits.video_seconds,
                "video preview limit reached, forcing pause"
            );
        }

        let directives = if just_breached {
            vec![VideoDirective::ForcePause, VideoDirective::ExitFullWindow]
        } else {
            Vec::new()
        };

        VideoGateUpdate {
            decision: decide(self.breached),
            just_breached,
            directives,
        }
    }

    /// Restarts the preview window from zero and resumes playback.
    pub fn restart(&mut self) -> VideoGateUpdate {
        self.elapsed_secs = 0.0;
        self.breached = false;
        self.paused = false;

        VideoGateUpdate {
            decision: decide(false),
            just_breached: false,
            directives: vec![VideoDirective::Resume],
        }
    }

    /// Latest elapsed-time report, in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn breached(&self) -> bool {
        self.breached
    }

    /// Whether the gate forced a pause that no restart has lifted yet.
    pub fn paused(&self) -> bool {
        self.paused
    }
}

// ============================================================================
// Document gate
// ============================================================================

/// Outcome of one page-change event or swipe back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentGateUpdate {
    pub decision: PreviewDecision,

    /// This page request went past the limit and was clamped.
    pub just_blocked: bool,

    /// Page the host must snap the cursor back to, when set.
    pub clamp_to: Option<u32>,
}

/// Progress-dot summary for the document viewer chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageIndicator {
    /// Dots to render.
    pub dots: u32,

    /// 1-based page the viewer rests on.
    pub current: u32,

    /// Pages hidden behind the gate, rendered as a "+N more" tail.
    pub more: u32,
}

/// Page-windowed gate over a paginated document.
///
/// Pages are 1-based. The overlay follows the sticky attempted-past-limit
/// flag rather than the raw page, so a cursor clamped back onto the limit
/// page still shows the overlay until the viewer swipes back.
#[derive(Clone, Debug)]
pub struct DocumentGate {
    limits: PreviewLimits,
    total_pages: u32,
    current_page: u32,
    past_limit_attempted: bool,
}

impl DocumentGate {
    /// Opens a document on its first page.
    pub fn open(limits: PreviewLimits, total_pages: u32) -> Self {
        Self {
            limits,
            total_pages,
            current_page: 1,
            past_limit_attempted: false,
        }
    }

    /// Feeds one page-change event from the document viewer.
    ///
    /// The request is first clamped to the document's valid page range, then
    /// for gated viewers to the preview limit. A past-limit request sets the
    /// sticky flag and returns the page to snap back to in `clamp_to`; the
    /// snap must land before the next event so the cursor never rests beyond
    /// the limit.
    pub fn turn_to(&mut self, page: u32, viewer: &Viewer) -> DocumentGateUpdate {
        let requested = page.clamp(1, self.total_pages.max(1));

        if viewer.bypasses_gate() {
            self.current_page = requested;
            return DocumentGateUpdate {
                decision: decide(false),
                just_blocked: false,
                clamp_to: None,
            };
        }

        let limit = self.limits.document_pages.max(1);
        if requested > limit {
            self.current_page = limit;
            self.past_limit_attempted = true;
            tracing::debug!(requested, limit, "document preview limit hit, clamping page");
            return DocumentGateUpdate {
                decision: decide(true),
                just_blocked: true,
                clamp_to: Some(limit),
            };
        }

        self.current_page = requested;
        DocumentGateUpdate {
            decision: decide(self.past_limit_attempted),
            just_blocked: false,
            clamp_to: None,
        }
    }

    /// Handles the gesture that intentionally returns below the limit.
    ///
    /// Clears the sticky flag and lifts the overlay; the cursor stays on
    /// whatever page it rests on.
    pub fn swipe_back(&mut self) -> DocumentGateUpdate {
        self.past_limit_attempted = false;

        DocumentGateUpdate {
            decision: decide(false),
            just_blocked: false,
            clamp_to: None,
        }
    }

    /// Progress-dot summary for the current viewer.
    ///
    /// Exempt viewers see one dot per page. Gated viewers see dots capped at
    /// the preview limit with the remainder folded into `more`.
    pub fn indicator(&self, viewer: &Viewer) -> PageIndicator {
        if viewer.bypasses_gate() {
            return PageIndicator {
                dots: self.total_pages,
                current: self.current_page,
                more: 0,
            };
        }

        let dots = self.total_pages.min(self.limits.document_pages.max(1));
        PageIndicator {
            dots,
            current: self.current_page,
            more: self.total_pages - dots,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether a past-limit request has been made and not yet swiped back.
    pub fn past_limit_attempted(&self) -> bool {
        self.past_limit_attempted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated() -> Viewer {
        Viewer {
            premium: false,
            first_case: false,
        }
    }

    #[test]
    fn video_stays_clear_below_the_limit() {
        let mut gate = VideoGate::new(PreviewLimits::default());
        for elapsed in [0.0, 12.5, 29.9] {
            let update = gate.observe(elapsed, &gated());
            assert!(!update.decision.overlay_visible);
            assert!(!update.decision.blurred);
            assert!(update.directives.is_empty());
        }
        assert!(!gate.breached());
    }

    #[test]
    fn video_breach_pauses_and_exits_full_window_exactly_once() {
        let mut gate = VideoGate::new(PreviewLimits::default());

        let update = gate.observe(30.0, &gated());
        assert!(update.just_breached);
        assert!(update.decision.overlay_visible);
        assert_eq!(
            update.directives,
            vec![VideoDirective::ForcePause, VideoDirective::ExitFullWindow]
        );
        assert!(gate.paused());

        let update = gate.observe(31.0, &gated());
        assert!(!update.just_breached);
        assert!(update.decision.overlay_visible);
        assert!(update.directives.is_empty());
    }

    #[test]
    fn video_breach_is_sticky_against_lower_readings() {
        let mut gate = VideoGate::new(PreviewLimits::default());
        gate.observe(30.0, &gated());

        let update = gate.observe(5.0, &gated());
        assert!(update.decision.overlay_visible);
        assert!(!update.just_breached);
        assert_eq!(gate.elapsed_secs(), 5.0);
        assert!(gate.breached());
    }

    #[test]
    fn video_restart_resumes_from_zero() {
        let mut gate = VideoGate::new(PreviewLimits::default());
        gate.observe(45.0, &gated());

        let update = gate.restart();
        assert_eq!(update.directives, vec![VideoDirective::Resume]);
        assert!(!update.decision.overlay_visible);
        assert_eq!(gate.elapsed_secs(), 0.0);
        assert!(!gate.breached());
        assert!(!gate.paused());

        let update = gate.observe(10.0, &gated());
        assert!(!update.decision.overlay_visible);
    }

    #[test]
    fn premium_viewer_never_breaches_video() {
        let viewer = Viewer {
            premium: true,
            first_case: false,
        };
        let mut gate = VideoGate::new(PreviewLimits::default());

        let update = gate.observe(500.0, &viewer);
        assert!(!update.decision.overlay_visible);
        assert!(!update.just_breached);
        assert!(update.directives.is_empty());
        assert!(!gate.breached());
    }

    #[test]
    fn first_case_viewer_never_breaches_video() {
        let viewer = Viewer {
            premium: false,
            first_case: true,
        };
        let mut gate = VideoGate::new(PreviewLimits::default());

        let update = gate.observe(90.0, &viewer);
        assert!(!update.decision.overlay_visible);
        assert!(!gate.breached());
    }

    #[test]
    fn custom_video_limit_is_respected() {
        let limits = PreviewLimits {
            video_seconds: 10.0,
            document_pages: 2,
        };
        let mut gate = VideoGate::new(limits);

        assert!(!gate.observe(9.9, &gated()).just_breached);
        assert!(gate.observe(10.0, &gated()).just_breached);
    }

    #[test]
    fn document_turns_within_limit_pass_through() {
        let mut gate = DocumentGate::open(PreviewLimits::default(), 10);

        for page in [2, 3, 4] {
            let update = gate.turn_to(page, &gated());
            assert!(!update.just_blocked);
            assert!(!update.decision.overlay_visible);
            assert_eq!(gate.current_page(), page);
        }
    }

    #[test]
    fn document_past_limit_clamps_and_overlays() {
        let mut gate = DocumentGate::open(PreviewLimits::default(), 10);

        let update = gate.turn_to(5, &gated());
        assert!(update.just_blocked);
        assert_eq!(update.clamp_to, Some(4));
        assert!(update.decision.overlay_visible);
        assert_eq!(gate.current_page(), 4);
        assert!(gate.past_limit_attempted());

        // Being clamped back onto the limit page keeps the overlay up.
        let update = gate.turn_to(4, &gated());
        assert!(!update.just_blocked);
        assert_eq!(update.clamp_to, None);
        assert!(update.decision.overlay_visible);
    }

    #[test]
    fn document_swipe_back_clears_overlay_on_the_limit_page() {
        let mut gate = DocumentGate::open(PreviewLimits::default(), 10);
        gate.turn_to(5, &gated());

        let update = gate.swipe_back();
        assert!(!update.decision.overlay_visible);
        assert_eq!(gate.current_page(), 4);
        assert!(!gate.past_limit_attempted());

        let update = gate.turn_to(3, &gated());
        assert!(!update.decision.overlay_visible);
        assert_eq!(gate.current_page(), 3);
    }

    #[test]
    fn document_requests_clamp_to_the_valid_page_range_first() {
        let mut gate = DocumentGate::open(PreviewLimits::default(), 10);
        let update = gate.turn_to(30, &gated());
        assert_eq!(update.clamp_to, Some(4));
        assert_eq!(gate.current_page(), 4);

        let mut short = DocumentGate::open(PreviewLimits::default(), 3);
        let update = short.turn_to(9, &gated());
        assert!(!update.just_blocked);
        assert_eq!(short.current_page(), 3);

        let update = short.turn_to(0, &gated());
        assert!(!update.just_blocked);
        assert_eq!(short.current_page(), 1);
    }

    #[test]
    fn premium_document_viewer_sees_every_page() {
        let viewer = Viewer {
            premium: true,
            first_case: false,
        };
        let mut gate = DocumentGate::open(PreviewLimits::default(), 10);

        let update = gate.turn_to(9, &viewer);
        assert!(!update.just_blocked);
        assert!(!update.decision.overlay_visible);
        assert_eq!(gate.current_page(), 9);

        // The valid-range clamp still applies without the gate.
        let update = gate.turn_to(99, &viewer);
        assert!(!update.just_blocked);
        assert_eq!(gate.current_page(), 10);

        let indicator = gate.indicator(&viewer);
        assert_eq!(indicator.dots, 10);
        assert_eq!(indicator.more, 0);
        assert_eq!(indicator.current, 10);
    }

    #[test]
    fn gated_indicator_caps_dots_at_the_limit() {
        let mut gate = DocumentGate::open(PreviewLimits::default(), 10);
        gate.turn_to(3, &gated());

        let indicator = gate.indicator(&gated());
        assert_eq!(indicator.dots, 4);
        assert_eq!(indicator.more, 6);
        assert_eq!(indicator.current, 3);
    }

    #[test]
    fn gated_indicator_on_short_documents_shows_all_dots() {
        let gate = DocumentGate::open(PreviewLimits::default(), 3);
        let indicator = gate.indicator(&gated());
        assert_eq!(indicator.dots, 3);
        assert_eq!(indicator.more, 0);
    }

    #[test]
    fn default_limits_match_product_values() {
        let limits = PreviewLimits::default();
        assert_eq!(limits.video_seconds, 30.0);
        assert_eq!(limits.document_pages, 4);
    }

    #[test]
    fn directives_serialize_kebab_case() {
        let json = serde_json::to_string(&VideoDirective::ForcePause).expect("serialize");
        assert_eq!(json, "\"force-pause\"");
        let json = serde_json::to_string(&VideoDirective::ExitFullWindow).expect("serialize");
        assert_eq!(json, "\"exit-full-window\"");
        let json = serde_json::to_string(&VideoDirective::Resume).expect("serialize");
        assert_eq!(json, "\"resume\"");
    }
}
