//! Source images: decoding plus the providers that resolve them from files, data URIs and URLs.

pub mod decode;
pub mod source;
