use diesel::prelude::*;

use crate::domain::campaign_type::{CampaignType, NewCampaignType, UpdateCampaignType};
use crate::domain::types::{CampaignTypeId, HubId};
use crate::models::campaign_type::{
    CampaignType as DbCampaignType, NewCampaignType as DbNewCampaignType,
    UpdateCampaignType as DbUpdateCampaignType,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CampaignTypeReader, CampaignTypeWriter, DieselRepository};

impl CampaignTypeReader for DieselRepository {
    fn list_campaign_types(&self, hub_id: HubId) -> RepositoryResult<Vec<CampaignType>> {
        use crate::schema::campaign_types;

        let mut conn = self.conn()?;
        let rows = campaign_types::table
            .filter(campaign_types::hub_id.eq(hub_id.get()))
            .order((campaign_types::name.asc(), campaign_types::id.asc()))
            .select(DbCampaignType::as_select())
            .load::<DbCampaignType>(&mut conn)?;

        rows.into_iter()
            .map(|row| CampaignType::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn get_campaign_type_by_id(
        &self,
        id: CampaignTypeId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<CampaignType>> {
        use crate::schema::campaign_types;

        let mut conn = self.conn()?;
        let row = campaign_types::table
            .filter(campaign_types::id.eq(id.get()))
            .filter(campaign_types::hub_id.eq(hub_id.get()))
            .select(DbCampaignType::as_select())
            .first::<DbCampaignType>(&mut conn)
            .optional()?;

        row.map(|row| CampaignType::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }
}

impl CampaignTypeWriter for DieselRepository {
    fn create_campaign_type(&self, new: &NewCampaignType) -> RepositoryResult<CampaignType> {
        use crate::schema::campaign_types;

        let mut conn = self.conn()?;
        let insertable: DbNewCampaignType = new.into();
        let row = diesel::insert_into(campaign_types::table)
            .values(&insertable)
            .returning(DbCampaignType::as_returning())
            .get_result::<DbCampaignType>(&mut conn)?;

        Ok(CampaignType::try_from(row)?)
    }

    fn update_campaign_type(
        &self,
        id: CampaignTypeId,
        hub_id: HubId,
        updates: &UpdateCampaignType,
    ) -> RepositoryResult<CampaignType> {
        use crate::schema::campaign_types;

        let mut conn = self.conn()?;
        let changes: DbUpdateCampaignType = updates.into();
        let row = diesel::update(
            campaign_types::table
                .filter(campaign_types::id.eq(id.get()))
                .filter(campaign_types::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .returning(DbCampaignType::as_returning())
        .get_result::<DbCampaignType>(&mut conn)?;

        Ok(CampaignType::try_from(row)?)
    }

    fn delete_campaign_type(&self, id: CampaignTypeId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::campaign_types;

        let mut conn = self.conn()?;
        // Campaigns keep existing; the foreign key nulls their type.
        let deleted = diesel::delete(
            campaign_types::table
                .filter(campaign_types::id.eq(id.get()))
                .filter(campaign_types::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
