//! Method registry
//!
//! Tracks which API methods support offset pagination. Only those may be
//! passed to [`Lister::list`](crate::list::Lister::list); everything else
//! has to go through a single call.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Built-in list methods of the REST API
static BUILTIN_LISTABLE: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "crm.activity.list",
        "crm.address.list",
        "crm.company.list",
        "crm.contact.list",
        "crm.currency.list",
        "crm.deal.list",
        "crm.dealcategory.list",
        "crm.invoice.list",
        "crm.item.list",
        "crm.lead.list",
        "crm.product.list",
        "crm.productrow.list",
        "crm.quote.list",
        "crm.requisite.list",
        "crm.status.list",
        "crm.timeline.comment.list",
        "department.get",
        "disk.folder.getchildren",
        "disk.storage.getlist",
        "lists.element.get",
        "sonet_group.get",
        "task.commentitem.getlist",
        "tasks.task.list",
        "telephony.externalLine.get",
        "user.get",
        "user.search",
    ]
    .into_iter()
    .collect()
});

/// Set of methods that return paginated listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRegistry {
    listable: BTreeSet<String>,
}

impl MethodRegistry {
    /// Registry holding the built-in list methods
    pub fn builtin() -> Self {
        Self {
            listable: BUILTIN_LISTABLE.iter().map(|m| normalize(m)).collect(),
        }
    }

    /// Registry with no listable methods
    pub fn empty() -> Self {
        Self {
            listable: BTreeSet::new(),
        }
    }

    /// Mark a method as listable
    #[must_use]
    pub fn with_listable(mut self, method: impl Into<String>) -> Self {
        self.register(method);
        self
    }

    /// Mark a method as listable
    pub fn register(&mut self, method: impl Into<String>) {
        self.listable.insert(normalize(&method.into()));
    }

    /// Whether the method supports listing
    pub fn is_listable(&self, method: &str) -> bool {
        self.listable.contains(&normalize(method))
    }

    /// All listable methods, sorted
    pub fn listable_methods(&self) -> impl Iterator<Item = &str> {
        self.listable.iter().map(String::as_str)
    }

    /// Number of listable methods
    pub fn len(&self) -> usize {
        self.listable.len()
    }

    /// Whether no method is listable
    pub fn is_empty(&self) -> bool {
        self.listable.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Method names are case-insensitive on the server and may carry a
/// `.json` transport suffix.
fn normalize(method: &str) -> String {
    let method = method.trim();
    let method = method.strip_suffix(".json").unwrap_or(method);
    method.to_ascii_lowercase()
}
