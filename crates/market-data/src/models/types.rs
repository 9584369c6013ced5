use std::borrow::Cow;
use std::sync::Arc;

/// Source adapter identifier - mostly static constants
pub type SourceId = Cow<'static, str>;

/// Provider-specific symbol discovered at runtime
pub type ProviderSymbol = Arc<str>;
