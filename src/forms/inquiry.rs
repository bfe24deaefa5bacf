use serde::Deserialize;
use validator::Validate;

use crate::domain::inquiry::{ContactDetails, NewInquiry, NewInquiryAnswer, UpdateInquiry};
use crate::domain::interaction::NewInteraction;
use crate::domain::types::{
    CampaignId, ContactEmail, HubId, InquiryId, InteractionKind, PhoneNumber, SanitizedText,
    SeekerName, Stage, TypeConstraintError, UserId,
};
use crate::forms::{FieldResult, FormError, optional_id, optional_text};

fn default_stage() -> String {
    Stage::New.as_str().to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnswerInput {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// Create/edit form for an inquiry.
///
/// Q&A pairs arrive either as an `answers` array (JSON) or as repeated
/// `question` / `answer` inputs (HTML); both sources are combined.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InquiryForm {
    #[serde(default, deserialize_with = "optional_id")]
    pub campaign_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_id")]
    pub assigned_to: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 200))]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 5000))]
    pub message: Option<String>,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub question: Vec<String>,
    #[serde(default)]
    pub answer: Vec<String>,
}

struct InquiryFields {
    campaign_id: Option<CampaignId>,
    assigned_to: Option<UserId>,
    name: SeekerName,
    contact: ContactDetails,
    city: Option<SanitizedText>,
    message: Option<SanitizedText>,
    answers: Vec<NewInquiryAnswer>,
}

impl InquiryForm {
    /// Q&A pairs in submission order; rows with a blank question are dropped.
    fn answer_pairs(&self) -> Vec<(String, String)> {
        let html = self
            .question
            .iter()
            .zip(self.answer.iter().map(String::as_str).chain(std::iter::repeat("")))
            .map(|(q, a)| (q.clone(), a.to_string()));
        self.answers
            .iter()
            .map(|input| (input.question.clone(), input.answer.clone()))
            .chain(html)
            .filter(|(q, _)| !q.trim().is_empty())
            .collect()
    }

    fn fields(self) -> Result<InquiryFields, FormError> {
        self.validate()?;

        let email = self
            .email
            .as_deref()
            .map(ContactEmail::new)
            .transpose()
            .field("email")?;
        let phone = self
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()
            .field("phone")?;
        let contact = ContactDetails::new(email, phone).field("contact")?;

        let answers = self
            .answer_pairs()
            .iter()
            .map(|(q, a)| NewInquiryAnswer::new(q, a))
            .collect::<Result<Vec<_>, TypeConstraintError>>()
            .field("answers")?;

        Ok(InquiryFields {
            campaign_id: self
                .campaign_id
                .map(CampaignId::new)
                .transpose()
                .field("campaign_id")?,
            assigned_to: self
                .assigned_to
                .map(UserId::new)
                .transpose()
                .field("assigned_to")?,
            name: SeekerName::new(self.name.trim()).field("name")?,
            contact,
            city: SanitizedText::optional(self.city),
            message: SanitizedText::optional(self.message),
            answers,
        })
    }

    pub fn into_new(self, hub_id: HubId) -> Result<NewInquiry, FormError> {
        let stage = self.stage.parse::<Stage>().field("stage")?;
        let fields = self.fields()?;
        Ok(NewInquiry {
            hub_id,
            campaign_id: fields.campaign_id,
            assigned_to: fields.assigned_to,
            name: fields.name,
            contact: fields.contact,
            city: fields.city,
            message: fields.message,
            stage,
            answers: fields.answers,
        })
    }

    /// The stage is not part of an edit; it changes through [`StageForm`].
    pub fn into_update(self) -> Result<UpdateInquiry, FormError> {
        let fields = self.fields()?;
        Ok(UpdateInquiry {
            campaign_id: fields.campaign_id,
            assigned_to: fields.assigned_to,
            name: fields.name,
            contact: fields.contact,
            city: fields.city,
            message: fields.message,
            answers: fields.answers,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageForm {
    pub stage: String,
}

impl StageForm {
    pub fn stage(&self) -> Result<Stage, FormError> {
        self.stage.parse().field("stage")
    }
}

/// A manually logged contact with the seeker.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InteractionForm {
    pub kind: String,
    #[validate(length(min = 1, max = 5000))]
    pub note: String,
}

impl InteractionForm {
    pub fn into_new(
        self,
        inquiry_id: InquiryId,
        user_id: Option<UserId>,
    ) -> Result<NewInteraction, FormError> {
        self.validate()?;
        let kind = self.kind.parse::<InteractionKind>().field("kind")?;
        // Stage changes are only written by the stage endpoint.
        if kind == InteractionKind::StageChange {
            return Err(FormError::InvalidField {
                field: "kind",
                reason: TypeConstraintError::InvalidValue(kind.to_string()),
            });
        }
        let note = SanitizedText::new(self.note).field("note")?;
        Ok(NewInteraction::new(inquiry_id, user_id, kind, note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> HubId {
        HubId::new(1).unwrap()
    }

    #[test]
    fn html_form_with_repeated_answers() {
        let form: InquiryForm = serde_html_form::from_str(
            "name=Ann&email=ANN%40example.com&phone=&campaign_id=3\
             &question=Programme&answer=Nursing&question=Start&answer=Autumn&question=+",
        )
        .unwrap();

        let new = form.into_new(hub()).unwrap();

        assert_eq!(new.stage, Stage::New);
        assert_eq!(
            new.contact.email().map(ContactEmail::as_str),
            Some("ann@example.com")
        );
        assert_eq!(new.campaign_id.map(CampaignId::get), Some(3));
        assert_eq!(new.answers.len(), 2);
        assert_eq!(new.answers[1].answer, "Autumn");
    }

    #[test]
    fn json_body_with_answers_array() {
        let form: InquiryForm = serde_json::from_str(
            r#"{"name": "Ben", "phone": "+14155552671", "stage": "qualified",
                "answers": [{"question": "Budget?", "answer": "Yes"}]}"#,
        )
        .unwrap();

        let new = form.into_new(hub()).unwrap();

        assert_eq!(new.stage, Stage::Qualified);
        assert_eq!(
            new.contact.phone().map(PhoneNumber::as_str),
            Some("+14155552671")
        );
        assert_eq!(new.answers[0].question.as_str(), "Budget?");
    }

    #[test]
    fn missing_contact_is_rejected() {
        let form: InquiryForm = serde_json::from_str(r#"{"name": "Cleo"}"#).unwrap();

        let err = form.into_new(hub()).unwrap_err();

        assert!(err.details().contains_key("contact"));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let form: InquiryForm =
            serde_json::from_str(r#"{"name": "Cleo", "email": "not-an-email"}"#).unwrap();

        let err = form.into_update().unwrap_err();

        assert!(err.details().contains_key("email"));
    }

    #[test]
    fn invalid_phone_is_rejected() {
        let form: InquiryForm =
            serde_json::from_str(r#"{"name": "Cleo", "phone": "12"}"#).unwrap();

        let err = form.into_new(hub()).unwrap_err();

        assert!(err.details().contains_key("phone"));
    }

    #[test]
    fn interaction_kind_must_be_manual() {
        let inquiry = InquiryId::new(1).unwrap();
        let form = InteractionForm {
            kind: "stage_change".to_string(),
            note: "moved".to_string(),
        };
        assert!(form.into_new(inquiry, None).is_err());

        let form = InteractionForm {
            kind: "call".to_string(),
            note: "Left a voicemail".to_string(),
        };
        let new = form.into_new(inquiry, None).unwrap();
        assert_eq!(new.kind, InteractionKind::Call);
    }
}
