/// Container layer analysis adapters
mod signature_analyzer;

pub use signature_analyzer::{LayerSignature, OsRelease, SignatureLayerAnalyzer};
