use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::campaign::{Campaign, NewCampaign, UpdateCampaign};
use crate::domain::types::{CampaignId, HubId};
use crate::models::campaign::{
    Campaign as DbCampaign, NewCampaign as DbNewCampaign, UpdateCampaign as DbUpdateCampaign,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CampaignListQuery, CampaignReader, CampaignWriter, DieselRepository, LIKE_ESCAPE,
    like_pattern,
};
use crate::schema::campaigns;

fn filtered(query: &CampaignListQuery) -> campaigns::BoxedQuery<'static, Sqlite> {
    let mut items = campaigns::table
        .filter(campaigns::hub_id.eq(query.hub_id.get()))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            campaigns::name
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(campaigns::description.like(pattern).escape(LIKE_ESCAPE)),
        );
    }
    if let Some(status) = query.status {
        items = items.filter(campaigns::status.eq(status.as_str()));
    }
    if let Some(campaign_type_id) = query.campaign_type_id {
        items = items.filter(campaigns::campaign_type_id.eq(campaign_type_id.get()));
    }

    items
}

impl CampaignReader for DieselRepository {
    fn list_campaigns(&self, query: CampaignListQuery) -> RepositoryResult<(usize, Vec<Campaign>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)?;

        let mut items = filtered(&query)
            .order((campaigns::start_date.desc(), campaigns::id.desc()))
            .select(DbCampaign::as_select());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let rows = items.load::<DbCampaign>(&mut conn)?;

        let campaigns = rows
            .into_iter()
            .map(|row| Campaign::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total as usize, campaigns))
    }

    fn get_campaign_by_id(
        &self,
        id: CampaignId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Campaign>> {
        let mut conn = self.conn()?;
        let row = campaigns::table
            .filter(campaigns::id.eq(id.get()))
            .filter(campaigns::hub_id.eq(hub_id.get()))
            .select(DbCampaign::as_select())
            .first::<DbCampaign>(&mut conn)
            .optional()?;

        row.map(|row| Campaign::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn count_inquiries_by_campaign(
        &self,
        hub_id: HubId,
        campaign_ids: &[CampaignId],
    ) -> RepositoryResult<HashMap<CampaignId, usize>> {
        use crate::schema::inquiries;

        if campaign_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = campaign_ids.iter().map(|id| id.get()).collect();
        let counts = inquiries::table
            .filter(inquiries::hub_id.eq(hub_id.get()))
            .filter(inquiries::deleted_at.is_null())
            .filter(inquiries::campaign_id.eq_any(ids))
            .group_by(inquiries::campaign_id)
            .select((inquiries::campaign_id, count_star()))
            .load::<(Option<i32>, i64)>(&mut conn)?;

        counts
            .into_iter()
            .filter_map(|(campaign_id, count)| campaign_id.map(|id| (id, count)))
            .map(|(id, count)| -> RepositoryResult<(CampaignId, usize)> {
                Ok((CampaignId::new(id)?, count as usize))
            })
            .collect()
    }
}

impl CampaignWriter for DieselRepository {
    fn create_campaign(&self, new: &NewCampaign) -> RepositoryResult<Campaign> {
        let mut conn = self.conn()?;
        let insertable: DbNewCampaign = new.into();
        let row = diesel::insert_into(campaigns::table)
            .values(&insertable)
            .returning(DbCampaign::as_returning())
            .get_result::<DbCampaign>(&mut conn)?;

        Ok(Campaign::try_from(row)?)
    }

    fn update_campaign(
        &self,
        id: CampaignId,
        hub_id: HubId,
        updates: &UpdateCampaign,
    ) -> RepositoryResult<Campaign> {
        let mut conn = self.conn()?;
        let changes: DbUpdateCampaign = updates.into();
        let row = diesel::update(
            campaigns::table
                .filter(campaigns::id.eq(id.get()))
                .filter(campaigns::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .returning(DbCampaign::as_returning())
        .get_result::<DbCampaign>(&mut conn)?;

        Ok(Campaign::try_from(row)?)
    }

    fn delete_campaign(&self, id: CampaignId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            campaigns::table
                .filter(campaigns::id.eq(id.get()))
                .filter(campaigns::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
