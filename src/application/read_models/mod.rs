//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of domain data for serialization.

pub mod spdx_read_model;
pub mod spdx_read_model_builder;

pub use spdx_read_model::{
    ChecksumView, DocumentView, ExternalRefView, FileView, PackageView, RelationshipView,
    SpdxReadModel, SPDX_VERSION,
};
pub use spdx_read_model_builder::SpdxReadModelBuilder;
