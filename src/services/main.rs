use serde::Serialize;

/// Body returned by the liveness endpoint.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Liveness {
    pub message: &'static str,
}

pub fn liveness() -> Liveness {
    Liveness {
        message: "The store catalog API is live.",
    }
}
