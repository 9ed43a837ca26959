//! UI module - handles all card rendering
//!
//! Structure:
//! - `draw.rs` - Frame composition
//! - `theme.rs` - Color themes and threshold bands
//! - `layout.rs` - Card grid geometry
//! - `card.rs` - Category card widgets

pub mod card;
mod draw;
pub mod layout;
pub mod theme;

// Re-export main draw function
pub use draw::draw;

// Re-export commonly used types
pub use theme::Theme;
