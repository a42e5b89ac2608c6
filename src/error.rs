use _model::Franchise;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{franchise} store locator returned HTTP {status}")]
    Status { franchise: Franchise, status: u16 },
    #[error("{franchise} store locator request failed")]
    Transport {
        franchise: Franchise,
        #[source]
        source: Box<ureq::Transport>,
    },
    #[error("failed to read {franchise} response body")]
    Body {
        franchise: Franchise,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn from_ureq(franchise: Franchise, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => Self::Status { franchise, status },
            ureq::Error::Transport(x) => Self::Transport {
                franchise,
                source: Box::new(x),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{franchise} response is missing the {marker} block")]
    MissingMarker {
        franchise: Franchise,
        marker: &'static str,
    },
    #[error("{franchise} response has an unreadable {marker} block")]
    Unescape {
        franchise: Franchise,
        marker: &'static str,
        #[source]
        source: quick_xml::escape::EscapeError,
    },
    #[error("{franchise} response is not valid store JSON")]
    Json {
        franchise: Franchise,
        #[source]
        source: serde_json::Error,
    },
}
