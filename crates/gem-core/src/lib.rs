//! Gem Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Gem compiler and
//! the renderers that consume its output. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: The fixed shade palette ([`color::Shade`], [`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Text**: Typed rich-text spans produced from GemMD ([`text::TextSpan`])
//! - **Scene**: The immutable scene graph handed to renderers ([`scene`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod scene;
pub mod text;
