use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::interaction::{
    Interaction as DomainInteraction, NewInteraction as DomainNewInteraction,
};
use crate::domain::types::{InquiryId, InteractionId, TypeConstraintError, UserId};

/// Diesel model for [`crate::domain::interaction::Interaction`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::interactions)]
pub struct Interaction {
    pub id: i32,
    pub inquiry_id: i32,
    pub user_id: Option<i32>,
    pub kind: String,
    pub note: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::interactions)]
pub struct NewInteraction<'a> {
    pub inquiry_id: i32,
    pub user_id: Option<i32>,
    pub kind: &'a str,
    pub note: &'a str,
}

/// An interaction row joined with its author's name.
impl TryFrom<(Interaction, Option<String>)> for DomainInteraction {
    type Error = TypeConstraintError;

    fn try_from((value, user_name): (Interaction, Option<String>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InteractionId::new(value.id)?,
            inquiry_id: InquiryId::new(value.inquiry_id)?,
            user_id: value.user_id.map(UserId::new).transpose()?,
            user_name,
            kind: value.kind.parse()?,
            note: value.note,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewInteraction> for NewInteraction<'a> {
    fn from(value: &'a DomainNewInteraction) -> Self {
        Self {
            inquiry_id: value.inquiry_id.get(),
            user_id: value.user_id.map(UserId::get),
            kind: value.kind.as_str(),
            note: value.note.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{InteractionKind, Stage};

    #[test]
    fn joined_row_into_domain() {
        let row = Interaction {
            id: 1,
            inquiry_id: 2,
            user_id: Some(3),
            kind: "CALL".to_string(),
            note: "Left a voicemail".to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };

        let domain = DomainInteraction::try_from((row, Some("Dana".to_string()))).unwrap();

        assert_eq!(domain.kind, InteractionKind::Call);
        assert_eq!(domain.user_name.as_deref(), Some("Dana"));
    }

    #[test]
    fn stage_change_into_insertable() {
        let domain = DomainNewInteraction::stage_change(
            InquiryId::new(4).unwrap(),
            None,
            Stage::New,
            Stage::Contacted,
        );

        let insertable: NewInteraction = (&domain).into();

        assert_eq!(insertable.kind, "STAGE_CHANGE");
        assert_eq!(insertable.note, "NEW → CONTACTED");
        assert_eq!(insertable.user_id, None);
    }
}
