//! Business rules on top of the repository traits.
//!
//! Every service function takes the repository as a generic `R: ...Reader +
//! ...Writer + ?Sized` so tests can pass the mockall repository, and the
//! authenticated user so that access is checked before anything is read.

use thiserror::Error;

use crate::domain::types::{CampaignId, HubId, TypeConstraintError, UserId};
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::repository::{CampaignReader, UserReader};

pub mod access;
pub mod campaign_types;
pub mod campaigns;
pub mod exports;
pub mod inquiries;
pub mod roles;
pub mod tasks;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Input rejected field by field.
    #[error(transparent)]
    Validation(#[from] FormError),

    /// Input rejected by a business rule.
    #[error("{0}")]
    Form(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Parses an identifier taken from the request path; invalid ids cannot
/// exist, so they are reported as missing.
pub(crate) fn path_id<T>(value: i32) -> ServiceResult<T>
where
    T: TryFrom<i32, Error = TypeConstraintError>,
{
    T::try_from(value).map_err(|_| ServiceError::NotFound)
}

/// Parses an optional filter value such as a status code.
pub(crate) fn parse_filter<T>(value: Option<&str>, field: &'static str) -> ServiceResult<Option<T>>
where
    T: std::str::FromStr<Err = TypeConstraintError>,
{
    value
        .map(str::parse::<T>)
        .transpose()
        .map_err(|reason| FormError::InvalidField { field, reason }.into())
}

/// Rejects a campaign reference that does not belong to the hub.
pub(crate) fn ensure_campaign<R>(
    repo: &R,
    hub_id: HubId,
    campaign_id: Option<CampaignId>,
) -> ServiceResult<()>
where
    R: CampaignReader + ?Sized,
{
    let Some(id) = campaign_id else {
        return Ok(());
    };
    match repo.get_campaign_by_id(id, hub_id)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form("Campaign not found".to_string())),
    }
}

/// Rejects an assignee that is not on the hub roster.
pub(crate) fn ensure_assignee<R>(
    repo: &R,
    hub_id: HubId,
    user_id: Option<UserId>,
) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
{
    let Some(id) = user_id else {
        return Ok(());
    };
    match repo.get_user_by_id(id, hub_id)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form("Assignee not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CampaignId, Stage};
    use crate::repository::mock::MockRepository;

    #[test]
    fn repository_errors_are_mapped() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConstraintViolation("unique".into())),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("down".into())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn path_ids_must_be_positive() {
        assert!(matches!(
            path_id::<CampaignId>(0),
            Err(ServiceError::NotFound)
        ));
        assert_eq!(path_id::<CampaignId>(4).unwrap().get(), 4);
    }

    #[test]
    fn filters_are_parsed_or_rejected() {
        assert_eq!(
            parse_filter::<Stage>(Some("lost"), "stage").unwrap(),
            Some(Stage::Lost)
        );
        assert_eq!(parse_filter::<Stage>(None, "stage").unwrap(), None);
        assert!(matches!(
            parse_filter::<Stage>(Some("WON"), "stage"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn foreign_campaign_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id().returning(|_, _| Ok(None));

        let hub = HubId::new(1).unwrap();
        let result = ensure_campaign(&repo, hub, Some(CampaignId::new(9).unwrap()));

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(ensure_campaign(&repo, hub, None).is_ok());
    }
}
