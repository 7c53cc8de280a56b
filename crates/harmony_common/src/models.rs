// --- File: crates/harmony_common/src/models.rs ---

// Identifiers and wire envelopes shared by every crate that talks to the
// Harmony API.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// `None` for the zero id, which the API never assigns.
            pub fn new(raw: u64) -> Option<Self> {
                (raw != 0).then_some(Self(raw))
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A business listed on the marketplace.
    BusinessId
);
id_type!(
    /// A bookable service offered by a business.
    ServiceId
);
id_type!(
    /// A staff member of a business.
    StaffId
);
id_type!(
    /// An existing booking.
    BookingId
);

/// API responses come either bare or wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiPayload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ApiPayload<T> {
    pub fn into_inner(self) -> T {
        match self {
            ApiPayload::Wrapped { data } => data,
            ApiPayload::Bare(data) => data,
        }
    }
}

/// Error body returned by the API; either field may carry the text.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}
