/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input identifier was empty or contained only whitespace
    #[error("identifier cannot be empty")]
    Empty,
}

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// The value is opaque to the engine: it is only ever compared for equality
        /// against other identifiers from the same case. Construction trims leading
        /// and trailing whitespace and rejects empty input, so a constructed
        /// identifier is always printable.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given input.
            ///
            /// The input is trimmed of leading and trailing whitespace. If the
            /// trimmed result is empty, an error is returned.
            pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
                let trimmed = input.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $name::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

opaque_id! {
    /// Identifier of one orderable test within a case.
    TestId
}

opaque_id! {
    /// Identifier of one diagnosis option within a case.
    DiagnosisId
}

opaque_id! {
    /// Identifier of one treatment option within a case.
    TreatmentId
}
