use thiserror::Error;

use crate::media::MediaKind;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid media URI {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported media kind: {0:?}")]
    UnsupportedKind(MediaKind),
}
