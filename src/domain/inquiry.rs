//! Inquiries ("seekers"): leads captured from marketing channels.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    CampaignId, ContactEmail, HubId, InquiryId, PhoneNumber, Question, SanitizedText, SeekerName,
    Stage, TypeConstraintError, UserId,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Inquiry {
    pub id: InquiryId,
    pub hub_id: HubId,
    pub campaign_id: Option<CampaignId>,
    pub assigned_to: Option<UserId>,
    pub name: SeekerName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub city: Option<String>,
    pub message: Option<String>,
    pub stage: Stage,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Inquiry {
    /// Whether the inquiry sits in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Ways to reach a seeker; at least one channel is always present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactDetails {
    email: Option<ContactEmail>,
    phone: Option<PhoneNumber>,
}

impl ContactDetails {
    pub fn new(
        email: Option<ContactEmail>,
        phone: Option<PhoneNumber>,
    ) -> Result<Self, TypeConstraintError> {
        if email.is_none() && phone.is_none() {
            return Err(TypeConstraintError::InvalidValue(
                "email or phone is required".to_string(),
            ));
        }
        Ok(Self { email, phone })
    }

    pub fn email(&self) -> Option<&ContactEmail> {
        self.email.as_ref()
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }
}

/// One intake question with the seeker's answer.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct InquiryAnswer {
    pub position: i32,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInquiryAnswer {
    pub question: Question,
    pub answer: String,
}

impl NewInquiryAnswer {
    /// Pairs a question with its trimmed answer; blank questions are rejected.
    pub fn new(question: &str, answer: &str) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            question: Question::new(question)?,
            answer: ammonia::clean(answer.trim()),
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewInquiry {
    pub hub_id: HubId,
    pub campaign_id: Option<CampaignId>,
    pub assigned_to: Option<UserId>,
    pub name: SeekerName,
    pub contact: ContactDetails,
    pub city: Option<SanitizedText>,
    pub message: Option<SanitizedText>,
    pub stage: Stage,
    pub answers: Vec<NewInquiryAnswer>,
}

/// Full replacement of the editable inquiry fields, answers included.
#[derive(Clone, Debug)]
pub struct UpdateInquiry {
    pub campaign_id: Option<CampaignId>,
    pub assigned_to: Option<UserId>,
    pub name: SeekerName,
    pub contact: ContactDetails,
    pub city: Option<SanitizedText>,
    pub message: Option<SanitizedText>,
    pub answers: Vec<NewInquiryAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_requires_a_channel() {
        assert!(ContactDetails::new(None, None).is_err());

        let email = ContactEmail::new("seeker@example.com").unwrap();
        let contact = ContactDetails::new(Some(email.clone()), None).unwrap();
        assert_eq!(contact.email(), Some(&email));
        assert_eq!(contact.phone(), None);
    }

    #[test]
    fn answers_need_a_question() {
        assert!(NewInquiryAnswer::new("  ", "yes").is_err());

        let answer = NewInquiryAnswer::new(" Preferred start? ", "  September ").unwrap();
        assert_eq!(answer.question.as_str(), "Preferred start?");
        assert_eq!(answer.answer, "September");
    }
}
