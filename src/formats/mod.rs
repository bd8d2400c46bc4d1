//! Format implementations
//!
//! Each format lives in its own module with a parser (format → IR), a serializer
//! (IR → format) and a `Format` implementation wiring both into the registry.
//!
//!     ├── markdown    comrak AST ↔ IR
//!     ├── latex       hand written tokenizer, block segmenter and printer
//!     └── docx        container → HTML → IR, and IR → docx-rs builders

pub mod docx;
pub mod latex;
pub mod markdown;
