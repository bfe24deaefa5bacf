use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    InquiryId, InteractionId, InteractionKind, SanitizedText, Stage, UserId,
};

/// A recorded contact with a seeker, shown in the inquiry history.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Interaction {
    pub id: InteractionId,
    pub inquiry_id: InquiryId,
    pub user_id: Option<UserId>,
    /// Display name of the author, when the author is still on the roster.
    pub user_name: Option<String>,
    pub kind: InteractionKind,
    pub note: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewInteraction {
    pub inquiry_id: InquiryId,
    pub user_id: Option<UserId>,
    pub kind: InteractionKind,
    pub note: SanitizedText,
}

impl NewInteraction {
    #[must_use]
    pub fn new(
        inquiry_id: InquiryId,
        user_id: Option<UserId>,
        kind: InteractionKind,
        note: SanitizedText,
    ) -> Self {
        Self {
            inquiry_id,
            user_id,
            kind,
            note,
        }
    }

    /// History entry written when an inquiry moves between stages.
    pub fn stage_change(
        inquiry_id: InquiryId,
        user_id: Option<UserId>,
        from: Stage,
        to: Stage,
    ) -> Self {
        Self {
            inquiry_id,
            user_id,
            kind: InteractionKind::StageChange,
            note: SanitizedText::trusted(format!("{from} → {to}")),
        }
    }
}
