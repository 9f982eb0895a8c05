use std::cmp::Ordering;

use shared::domain::User;

pub const EMPTY_COLLECTION_MESSAGE: &str = "Nenhum usuário cadastrado";
pub const NO_MATCHES_MESSAGE: &str = "Nenhum usuário encontrado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Users whose name or email contains `filter` (case-insensitive), sorted by
/// name.
pub fn filter_and_sort<'a>(users: &'a [User], filter: &str, order: SortOrder) -> Vec<&'a User> {
    let needle = filter.to_lowercase();
    let mut visible: Vec<&User> = users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&needle) || user.email.to_lowercase().contains(&needle)
        })
        .collect();

    visible.sort_by(|a, b| {
        let ordering = compare_names(&a.name, &b.name);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    visible
}

/// Placeholder text for an empty listing, or `None` when rows are shown.
pub fn empty_message(total: usize, visible: usize) -> Option<&'static str> {
    match (total, visible) {
        (0, _) => Some(EMPTY_COLLECTION_MESSAGE),
        (_, 0) => Some(NO_MATCHES_MESSAGE),
        _ => None,
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
