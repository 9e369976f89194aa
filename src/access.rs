//! Access Policy
//!
//! Who may read or change an order. Ownership is fixed at order creation;
//! moderators may act on any order regardless of ownership.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{orders::Order, uuids::TypedUuid};

/// Authenticated user marker.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// The resolved identity an operation is performed on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "user", rename_all = "snake_case")]
pub enum Actor {
    /// Unauthenticated visitor; may browse the catalog only.
    Anonymous,
    /// Signed-in customer.
    Customer(UserUuid),
    /// Staff member with moderator capability.
    Moderator(UserUuid),
}

/// Operations guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    CreateDraft,
    AddProperty,
    RemoveLine,
    UpdateLine,
    UpdateClientDetails,
    Submit,
    Approve,
    Reject,
    Delete,
}

impl Action {
    /// Verb used in messages ("cannot {verb} this order").
    pub const fn verb(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::CreateDraft => "create a draft for",
            Self::AddProperty => "add properties to",
            Self::RemoveLine => "remove properties from",
            Self::UpdateLine => "edit lines of",
            Self::UpdateClientDetails => "edit client details of",
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Delete => "delete",
        }
    }

    /// Past participle used in state errors ("only drafts may be {done}").
    pub const fn done(self) -> &'static str {
        match self {
            Self::View => "viewed",
            Self::CreateDraft => "created",
            Self::AddProperty | Self::RemoveLine | Self::UpdateLine | Self::UpdateClientDetails => {
                "modified"
            }
            Self::Submit => "submitted",
            Self::Approve => "approved",
            Self::Reject => "rejected",
            Self::Delete => "deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

impl Actor {
    /// The signed-in user, if any.
    pub const fn user(&self) -> Option<UserUuid> {
        match self {
            Self::Anonymous => None,
            Self::Customer(user) | Self::Moderator(user) => Some(*user),
        }
    }

    /// Whether this actor holds moderator capability.
    pub const fn is_moderator(&self) -> bool {
        matches!(self, Self::Moderator(_))
    }

    /// Whether this actor created the order.
    pub fn owns(&self, order: &Order) -> bool {
        self.user() == Some(order.creator)
    }

    /// Apply the policy for `action` on `order`.
    pub fn may(&self, action: Action, order: &Order) -> bool {
        match action {
            // Only the owner places an order; moderators work on formed ones.
            Action::Submit | Action::UpdateClientDetails => self.owns(order),
            Action::Approve | Action::Reject | Action::UpdateLine => self.is_moderator(),
            Action::View
            | Action::CreateDraft
            | Action::AddProperty
            | Action::RemoveLine
            | Action::Delete => self.owns(order) || self.is_moderator(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::orders::Order;

    use super::*;

    #[test]
    fn owner_can_submit_but_not_approve() {
        let owner = UserUuid::new();
        let order = Order::draft(owner, jiff::Timestamp::UNIX_EPOCH);
        let actor = Actor::Customer(owner);

        assert!(actor.may(Action::Submit, &order));
        assert!(actor.may(Action::Delete, &order));
        assert!(!actor.may(Action::Approve, &order));
        assert!(!actor.may(Action::UpdateLine, &order));
    }

    #[test]
    fn moderator_can_moderate_but_not_submit_for_others() {
        let order = Order::draft(UserUuid::new(), jiff::Timestamp::UNIX_EPOCH);
        let actor = Actor::Moderator(UserUuid::new());

        assert!(actor.may(Action::Approve, &order));
        assert!(actor.may(Action::Reject, &order));
        assert!(actor.may(Action::Delete, &order));
        assert!(actor.may(Action::View, &order));
        assert!(!actor.may(Action::Submit, &order));
    }

    #[test]
    fn strangers_and_anonymous_are_refused() {
        let order = Order::draft(UserUuid::new(), jiff::Timestamp::UNIX_EPOCH);

        for actor in [Actor::Anonymous, Actor::Customer(UserUuid::new())] {
            assert!(!actor.may(Action::View, &order), "{actor:?} viewed");
            assert!(!actor.may(Action::AddProperty, &order), "{actor:?} added");
            assert!(!actor.may(Action::Delete, &order), "{actor:?} deleted");
        }
    }
}
