//! Compression handling for TIFF files
//!
//! Decoding strategies for the compression methods found in the wild,
//! picked by code through `CompressionFactory`.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod lzw;
mod packbits;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use lzw::LzwHandler;
pub use packbits::PackBitsHandler;
pub use zstd::ZstdHandler;
