/// Variable-width integer helpers shared by the integer payload variants.
pub mod primitives;
/// Zero-copy MSB-first bit reader.
pub mod reader;
/// Bit writer into a caller-owned buffer.
pub mod writer;
