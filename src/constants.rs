//! Global constants used throughout tplc.
//!
//! Defaults and limits shared by the text, templating and CLI layers live here
//! so they are discoverable in one place.

/// Separator used between slug words when none is configured.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Context key the per-file slug is attached under.
pub const DEFAULT_SLUG_KEY: &str = "slug";

/// Context key the process environment is exposed under.
pub const ENV_CONTEXT_KEY: &str = "env";

/// Maximum object nesting a context merge will descend into.
///
/// Deeper structures fail with [`TplcError::CyclicStructure`](crate::core::TplcError)
/// rather than exhausting the stack.
pub const MAX_MERGE_DEPTH: usize = 64;

/// Tag name opening a front matter block (`{% frontmatter %}`).
pub const FRONTMATTER_START_TAG: &str = "frontmatter";

/// Tag name closing a front matter block (`{% endfrontmatter %}`).
pub const FRONTMATTER_END_TAG: &str = "endfrontmatter";
