//! Inquiries with their Q&A answers, interaction history and trash lifecycle.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::inquiry::{Inquiry, InquiryAnswer, NewInquiry, UpdateInquiry};
use crate::domain::interaction::{Interaction, NewInteraction};
use crate::domain::types::{HubId, InquiryId, Stage};
use crate::models::inquiry::{
    Inquiry as DbInquiry, InquiryAnswer as DbInquiryAnswer, NewInquiry as DbNewInquiry,
    NewInquiryAnswer as DbNewInquiryAnswer, UpdateInquiry as DbUpdateInquiry,
};
use crate::models::interaction::{
    Interaction as DbInteraction, NewInteraction as DbNewInteraction,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, InquiryListQuery, InquiryReader, InquiryWriter, LIKE_ESCAPE,
    like_pattern,
};
use crate::schema::{inquiries, inquiry_answers, interactions};

fn filtered(query: &InquiryListQuery) -> inquiries::BoxedQuery<'static, Sqlite> {
    let mut items = inquiries::table
        .filter(inquiries::hub_id.eq(query.hub_id.get()))
        .into_boxed::<Sqlite>();

    items = if query.trashed {
        items.filter(inquiries::deleted_at.is_not_null())
    } else {
        items.filter(inquiries::deleted_at.is_null())
    };

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            inquiries::name
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(inquiries::email.like(pattern.clone()).escape(LIKE_ESCAPE))
                .or(inquiries::phone.like(pattern.clone()).escape(LIKE_ESCAPE))
                .or(inquiries::city.like(pattern).escape(LIKE_ESCAPE)),
        );
    }
    if let Some(stage) = query.stage {
        items = items.filter(inquiries::stage.eq(stage.as_str()));
    }
    if let Some(campaign_id) = query.campaign_id {
        items = items.filter(inquiries::campaign_id.eq(campaign_id.get()));
    }
    if let Some(user_id) = query.assigned_to {
        items = items.filter(inquiries::assigned_to.eq(user_id.get()));
    }

    items
}

fn to_domain(row: DbInquiry) -> RepositoryResult<Inquiry> {
    Inquiry::try_from(row).map_err(RepositoryError::from)
}

fn author_name(conn: &mut SqliteConnection, user_id: Option<i32>) -> QueryResult<Option<String>> {
    use crate::schema::users;

    match user_id {
        Some(user_id) => users::table
            .find(user_id)
            .select(users::name)
            .first::<String>(conn)
            .optional(),
        None => Ok(None),
    }
}

impl InquiryReader for DieselRepository {
    fn list_inquiries(&self, query: InquiryListQuery) -> RepositoryResult<(usize, Vec<Inquiry>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)?;

        let mut items = filtered(&query)
            .order((inquiries::created_at.desc(), inquiries::id.desc()))
            .select(DbInquiry::as_select());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let inquiries = items
            .load::<DbInquiry>(&mut conn)?
            .into_iter()
            .map(to_domain)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total as usize, inquiries))
    }

    fn get_inquiry_by_id(
        &self,
        id: InquiryId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Inquiry>> {
        let mut conn = self.conn()?;
        let row = inquiries::table
            .filter(inquiries::id.eq(id.get()))
            .filter(inquiries::hub_id.eq(hub_id.get()))
            .select(DbInquiry::as_select())
            .first::<DbInquiry>(&mut conn)
            .optional()?;

        row.map(to_domain).transpose()
    }

    fn list_inquiry_answers(&self, inquiry_id: InquiryId) -> RepositoryResult<Vec<InquiryAnswer>> {
        let mut conn = self.conn()?;
        let rows = inquiry_answers::table
            .filter(inquiry_answers::inquiry_id.eq(inquiry_id.get()))
            .order((inquiry_answers::position.asc(), inquiry_answers::id.asc()))
            .select(DbInquiryAnswer::as_select())
            .load::<DbInquiryAnswer>(&mut conn)?;

        Ok(rows.into_iter().map(InquiryAnswer::from).collect())
    }

    fn list_interactions(&self, inquiry_id: InquiryId) -> RepositoryResult<Vec<Interaction>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let rows = interactions::table
            .left_join(users::table)
            .filter(interactions::inquiry_id.eq(inquiry_id.get()))
            .order((interactions::created_at.desc(), interactions::id.desc()))
            .select((DbInteraction::as_select(), users::name.nullable()))
            .load::<(DbInteraction, Option<String>)>(&mut conn)?;

        rows.into_iter()
            .map(|row| Interaction::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl InquiryWriter for DieselRepository {
    fn create_inquiry(&self, new: &NewInquiry) -> RepositoryResult<Inquiry> {
        let mut conn = self.conn()?;
        let insertable: DbNewInquiry = new.into();

        let row = conn.transaction::<DbInquiry, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(inquiries::table)
                .values(&insertable)
                .returning(DbInquiry::as_returning())
                .get_result::<DbInquiry>(conn)?;

            let answers = DbNewInquiryAnswer::rows(row.id, &new.answers);
            if !answers.is_empty() {
                diesel::insert_into(inquiry_answers::table)
                    .values(&answers)
                    .execute(conn)?;
            }

            Ok(row)
        })?;

        to_domain(row)
    }

    fn update_inquiry(
        &self,
        id: InquiryId,
        hub_id: HubId,
        updates: &UpdateInquiry,
    ) -> RepositoryResult<Inquiry> {
        let mut conn = self.conn()?;
        let changes: DbUpdateInquiry = updates.into();

        let row = conn.transaction::<DbInquiry, RepositoryError, _>(|conn| {
            let row = diesel::update(
                inquiries::table
                    .filter(inquiries::id.eq(id.get()))
                    .filter(inquiries::hub_id.eq(hub_id.get())),
            )
            .set(&changes)
            .returning(DbInquiry::as_returning())
            .get_result::<DbInquiry>(conn)?;

            // Answers are replaced wholesale.
            diesel::delete(inquiry_answers::table.filter(inquiry_answers::inquiry_id.eq(row.id)))
                .execute(conn)?;
            let answers = DbNewInquiryAnswer::rows(row.id, &updates.answers);
            if !answers.is_empty() {
                diesel::insert_into(inquiry_answers::table)
                    .values(&answers)
                    .execute(conn)?;
            }

            Ok(row)
        })?;

        to_domain(row)
    }

    fn set_inquiry_stage(
        &self,
        id: InquiryId,
        hub_id: HubId,
        stage: Stage,
        history: &NewInteraction,
    ) -> RepositoryResult<Inquiry> {
        let mut conn = self.conn()?;
        let entry: DbNewInteraction = history.into();

        let row = conn.transaction::<DbInquiry, RepositoryError, _>(|conn| {
            let row = diesel::update(
                inquiries::table
                    .filter(inquiries::id.eq(id.get()))
                    .filter(inquiries::hub_id.eq(hub_id.get())),
            )
            .set((
                inquiries::stage.eq(stage.as_str()),
                inquiries::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(DbInquiry::as_returning())
            .get_result::<DbInquiry>(conn)?;

            diesel::insert_into(interactions::table)
                .values(&entry)
                .execute(conn)?;

            Ok(row)
        })?;

        to_domain(row)
    }

    fn create_interaction(&self, new: &NewInteraction) -> RepositoryResult<Interaction> {
        let mut conn = self.conn()?;
        let insertable: DbNewInteraction = new.into();

        let row = diesel::insert_into(interactions::table)
            .values(&insertable)
            .returning(DbInteraction::as_returning())
            .get_result::<DbInteraction>(&mut conn)?;
        let user_name = author_name(&mut conn, row.user_id)?;

        Ok(Interaction::try_from((row, user_name))?)
    }

    fn trash_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<Inquiry> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::update(
            inquiries::table
                .filter(inquiries::id.eq(id.get()))
                .filter(inquiries::hub_id.eq(hub_id.get()))
                .filter(inquiries::deleted_at.is_null()),
        )
        .set((
            inquiries::deleted_at.eq(Some(now)),
            inquiries::updated_at.eq(now),
        ))
        .returning(DbInquiry::as_returning())
        .get_result::<DbInquiry>(&mut conn)?;

        to_domain(row)
    }

    fn restore_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<Inquiry> {
        let mut conn = self.conn()?;
        let row = diesel::update(
            inquiries::table
                .filter(inquiries::id.eq(id.get()))
                .filter(inquiries::hub_id.eq(hub_id.get()))
                .filter(inquiries::deleted_at.is_not_null()),
        )
        .set((
            inquiries::deleted_at.eq(None::<chrono::NaiveDateTime>),
            inquiries::updated_at.eq(Utc::now().naive_utc()),
        ))
        .returning(DbInquiry::as_returning())
        .get_result::<DbInquiry>(&mut conn)?;

        to_domain(row)
    }

    fn purge_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        // Answers, interactions and follow-up tasks cascade.
        let deleted = diesel::delete(
            inquiries::table
                .filter(inquiries::id.eq(id.get()))
                .filter(inquiries::hub_id.eq(hub_id.get()))
                .filter(inquiries::deleted_at.is_not_null()),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
