//! Corporate values — the named traits a recognition is tagged with.

use serde::{Deserialize, Serialize};

/// A corporate value. `name` is the unique key that medals reference; a
/// medal may carry a value name with no matching entry, and consumers must
/// fall back to neutral rendering defaults rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Value {
  pub name:        String,
  /// Hex color used when rendering this value.
  pub color:       String,
  /// Emoji glyph shown next to the value name.
  pub icon:        String,
  pub description: String,
  pub example:     String,
}
