/// Document parsing: PDF extraction and text cleanup
mod pdf_loader;
mod text_normalizer;

pub use pdf_loader::PdfLoader;
pub use text_normalizer::TextNormalizer;
