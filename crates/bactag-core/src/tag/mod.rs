/// The envelope pairing a header with one payload variant.
pub mod envelope;
/// Header fields, class discriminator and length extensions.
pub mod header;
/// Variant selection from a decoded header.
pub mod registry;

pub use envelope::Envelope;
pub use header::{AppTag, ExtendedLength, TagClass, TagHeader};
pub use registry::TagKind;
