//! Capability resolution for (user, itinerary) pairs.
//!
//! Pure functions over the itinerary owner and its collaborator rows; no I/O.
//! Callers authenticate first - an unauthenticated requester never reaches
//! this module.

use std::collections::HashMap;

use serde::Serialize;

use crate::database::models::{Collaborator, Role};

/// The access level resolved for a requester on an itinerary.
/// Ordered: higher capability implies everything below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Capability {
    None,
    Viewer,
    Editor,
    Owner,
}

impl Capability {
    pub fn can_view(self) -> bool {
        self >= Capability::Viewer
    }

    pub fn can_edit(self) -> bool {
        self >= Capability::Editor
    }

    pub fn is_owner(self) -> bool {
        self == Capability::Owner
    }
}

impl From<Role> for Capability {
    fn from(role: Role) -> Self {
        match role {
            Role::Viewer => Capability::Viewer,
            Role::Editor => Capability::Editor,
        }
    }
}

/// Role lookup for one itinerary, keyed by user id and built once per
/// request from its collaborator rows.
///
/// Rows must be supplied in write order: if a user somehow appears more than
/// once (the unique constraint forbids it), the most recently written role
/// wins. Roles are never aggregated.
#[derive(Debug, Default)]
pub struct CollaboratorRoles {
    roles: HashMap<i64, Role>,
}

impl CollaboratorRoles {
    pub fn from_rows(rows: &[Collaborator]) -> Self {
        let mut roles = HashMap::with_capacity(rows.len());
        for row in rows {
            roles.insert(row.user_id, row.role);
        }
        Self { roles }
    }

    pub fn role_of(&self, user_id: i64) -> Option<Role> {
        self.roles.get(&user_id).copied()
    }
}

/// Resolve the requester's capability on an itinerary.
///
/// Owner match wins outright; otherwise the collaborator set decides;
/// absent means no view or edit rights.
pub fn resolve(owner_id: i64, collaborators: &CollaboratorRoles, requester_id: i64) -> Capability {
    if requester_id == owner_id {
        return Capability::Owner;
    }
    match collaborators.role_of(requester_id) {
        Some(role) => role.into(),
        None => Capability::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(id: i64, itinerary_id: i64, user_id: i64, role: Role) -> Collaborator {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Collaborator {
            id,
            itinerary_id,
            user_id,
            role,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn owner_iff_owner_id_matches() {
        let roles = CollaboratorRoles::from_rows(&[row(1, 5, 20, Role::Editor)]);
        assert_eq!(resolve(10, &roles, 10), Capability::Owner);
        assert_ne!(resolve(10, &roles, 20), Capability::Owner);
    }

    #[test]
    fn collaborator_role_maps_directly() {
        let roles = CollaboratorRoles::from_rows(&[
            row(1, 5, 20, Role::Editor),
            row(2, 5, 30, Role::Viewer),
        ]);
        assert_eq!(resolve(10, &roles, 20), Capability::Editor);
        assert_eq!(resolve(10, &roles, 30), Capability::Viewer);
    }

    #[test]
    fn unknown_requester_resolves_to_none() {
        let roles = CollaboratorRoles::from_rows(&[row(1, 5, 20, Role::Editor)]);
        assert_eq!(resolve(10, &roles, 99), Capability::None);

        let empty = CollaboratorRoles::default();
        assert_eq!(resolve(10, &empty, 99), Capability::None);
    }

    #[test]
    fn owner_wins_even_with_stray_collaborator_row() {
        // The invite workflow never writes a row for the owner, but a stray
        // one must not demote them.
        let roles = CollaboratorRoles::from_rows(&[row(1, 5, 10, Role::Viewer)]);
        assert_eq!(resolve(10, &roles, 10), Capability::Owner);
    }

    #[test]
    fn duplicate_rows_resolve_to_most_recent_role() {
        let roles = CollaboratorRoles::from_rows(&[
            row(1, 5, 20, Role::Viewer),
            row(2, 5, 20, Role::Editor),
        ]);
        assert_eq!(resolve(10, &roles, 20), Capability::Editor);

        // And the reverse order: no aggregation toward the stronger role
        let roles = CollaboratorRoles::from_rows(&[
            row(1, 5, 20, Role::Editor),
            row(2, 5, 20, Role::Viewer),
        ]);
        assert_eq!(resolve(10, &roles, 20), Capability::Viewer);
    }

    #[test]
    fn capability_ordering_gates() {
        assert!(Capability::Owner.can_edit());
        assert!(Capability::Owner.can_view());
        assert!(Capability::Editor.can_edit());
        assert!(Capability::Editor.can_view());
        assert!(!Capability::Viewer.can_edit());
        assert!(Capability::Viewer.can_view());
        assert!(!Capability::None.can_view());
        assert!(!Capability::None.can_edit());
        assert!(!Capability::Editor.is_owner());
    }
}
