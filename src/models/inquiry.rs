use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::inquiry::{
    Inquiry as DomainInquiry, InquiryAnswer as DomainInquiryAnswer,
    NewInquiry as DomainNewInquiry, NewInquiryAnswer as DomainNewInquiryAnswer,
    UpdateInquiry as DomainUpdateInquiry,
};
use crate::domain::types::{
    CampaignId, ContactEmail, HubId, InquiryId, PhoneNumber, SeekerName, TypeConstraintError,
    UserId,
};

/// Diesel model for [`crate::domain::inquiry::Inquiry`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::inquiries)]
pub struct Inquiry {
    pub id: i32,
    pub hub_id: i32,
    pub campaign_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub message: Option<String>,
    pub stage: String,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Inquiry`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::inquiries)]
pub struct NewInquiry<'a> {
    pub hub_id: i32,
    pub campaign_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub message: Option<&'a str>,
    pub stage: &'a str,
}

/// Data used when updating an [`Inquiry`] record.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::inquiries)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateInquiry<'a> {
    pub campaign_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub message: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::inquiry_answers)]
#[diesel(belongs_to(Inquiry, foreign_key = inquiry_id))]
pub struct InquiryAnswer {
    pub id: i32,
    pub inquiry_id: i32,
    pub position: i32,
    pub question: String,
    pub answer: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::inquiry_answers)]
pub struct NewInquiryAnswer<'a> {
    pub inquiry_id: i32,
    pub position: i32,
    pub question: &'a str,
    pub answer: &'a str,
}

impl<'a> NewInquiryAnswer<'a> {
    /// Rows for a full answer set, numbered in submission order.
    pub fn rows(inquiry_id: i32, answers: &'a [DomainNewInquiryAnswer]) -> Vec<Self> {
        answers
            .iter()
            .zip(0..)
            .map(|(answer, position)| Self {
                inquiry_id,
                position,
                question: answer.question.as_str(),
                answer: answer.answer.as_str(),
            })
            .collect()
    }
}

impl TryFrom<Inquiry> for DomainInquiry {
    type Error = TypeConstraintError;

    fn try_from(value: Inquiry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InquiryId::new(value.id)?,
            hub_id: HubId::new(value.hub_id)?,
            campaign_id: value.campaign_id.map(CampaignId::new).transpose()?,
            assigned_to: value.assigned_to.map(UserId::new).transpose()?,
            name: SeekerName::new(value.name)?,
            email: value.email.map(ContactEmail::new).transpose()?,
            phone: value.phone.map(PhoneNumber::new).transpose()?,
            city: value.city,
            message: value.message,
            stage: value.stage.parse()?,
            deleted_at: value.deleted_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl From<InquiryAnswer> for DomainInquiryAnswer {
    fn from(value: InquiryAnswer) -> Self {
        Self {
            position: value.position,
            question: value.question,
            answer: value.answer,
        }
    }
}

impl<'a> From<&'a DomainNewInquiry> for NewInquiry<'a> {
    fn from(value: &'a DomainNewInquiry) -> Self {
        Self {
            hub_id: value.hub_id.get(),
            campaign_id: value.campaign_id.map(CampaignId::get),
            assigned_to: value.assigned_to.map(UserId::get),
            name: value.name.as_str(),
            email: value.contact.email().map(ContactEmail::as_str),
            phone: value.contact.phone().map(PhoneNumber::as_str),
            city: value.city.as_ref().map(|c| c.as_str()),
            message: value.message.as_ref().map(|m| m.as_str()),
            stage: value.stage.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateInquiry> for UpdateInquiry<'a> {
    fn from(value: &'a DomainUpdateInquiry) -> Self {
        Self {
            campaign_id: value.campaign_id.map(CampaignId::get),
            assigned_to: value.assigned_to.map(UserId::get),
            name: value.name.as_str(),
            email: value.contact.email().map(ContactEmail::as_str),
            phone: value.contact.phone().map(PhoneNumber::as_str),
            city: value.city.as_ref().map(|c| c.as_str()),
            message: value.message.as_ref().map(|m| m.as_str()),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inquiry::ContactDetails;
    use crate::domain::types::{SanitizedText, Stage};

    #[test]
    fn inquiry_into_domain() {
        let now = chrono::Utc::now().naive_utc();
        let db = Inquiry {
            id: 7,
            hub_id: 1,
            campaign_id: None,
            assigned_to: Some(3),
            name: "Alice".to_string(),
            email: Some("Alice@Example.com".to_string()),
            phone: None,
            city: Some("Berlin".to_string()),
            message: None,
            stage: "INTERESTED".to_string(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let domain = DomainInquiry::try_from(db).expect("valid inquiry");

        assert_eq!(domain.id.get(), 7);
        assert_eq!(domain.stage, Stage::Interested);
        assert_eq!(domain.assigned_to.map(UserId::get), Some(3));
        assert_eq!(
            domain.email.as_ref().map(ContactEmail::as_str),
            Some("alice@example.com")
        );
        assert!(!domain.is_trashed());
    }

    #[test]
    fn new_inquiry_from_domain() {
        let contact = ContactDetails::new(None, Some(PhoneNumber::new("+14155552671").unwrap()))
            .unwrap();
        let domain = DomainNewInquiry {
            hub_id: HubId::new(1).unwrap(),
            campaign_id: Some(CampaignId::new(2).unwrap()),
            assigned_to: None,
            name: SeekerName::new("Bob").unwrap(),
            contact,
            city: SanitizedText::optional(Some("Paris")),
            message: None,
            stage: Stage::New,
            answers: vec![],
        };

        let insertable: NewInquiry = (&domain).into();

        assert_eq!(insertable.campaign_id, Some(2));
        assert_eq!(insertable.email, None);
        assert_eq!(insertable.phone, Some("+14155552671"));
        assert_eq!(insertable.city, Some("Paris"));
        assert_eq!(insertable.stage, "NEW");
    }

    #[test]
    fn answer_rows_are_numbered_in_order() {
        let answers = vec![
            DomainNewInquiryAnswer::new("Programme?", "Nursing").unwrap(),
            DomainNewInquiryAnswer::new("Start?", "Autumn").unwrap(),
        ];

        let rows = NewInquiryAnswer::rows(5, &answers);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, 0);
        assert_eq!(rows[1].position, 1);
        assert_eq!(rows[1].question, "Start?");
        assert!(rows.iter().all(|row| row.inquiry_id == 5));
    }
}
