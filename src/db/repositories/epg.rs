use crate::entities::{epg_program, prelude::*};
use crate::models::EpgProgram;
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

pub struct EpgRepository {
    conn: DatabaseConnection,
}

impl EpgRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: epg_program::Model) -> EpgProgram {
        EpgProgram {
            id: model.id,
            channel_id: model.channel_id,
            title: model.title,
            description: model.description,
            start_time: model.start_time,
            end_time: model.end_time,
            language: model.language,
        }
    }

    fn active_model(program: &EpgProgram) -> epg_program::ActiveModel {
        epg_program::ActiveModel {
            id: Set(program.id.clone()),
            channel_id: Set(program.channel_id.clone()),
            title: Set(program.title.clone()),
            description: Set(program.description.clone()),
            start_time: Set(program.start_time),
            end_time: Set(program.end_time),
            language: Set(program.language.clone()),
        }
    }

    fn replace_conflict() -> OnConflict {
        OnConflict::column(epg_program::Column::Id)
            .update_columns([
                epg_program::Column::ChannelId,
                epg_program::Column::Title,
                epg_program::Column::Description,
                epg_program::Column::StartTime,
                epg_program::Column::EndTime,
                epg_program::Column::Language,
            ])
            .to_owned()
    }

    /// Programmes fully contained in the window, earliest first.
    pub async fn programs_in_range(
        &self,
        channel_id: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<EpgProgram>> {
        let rows = EpgPrograms::find()
            .filter(epg_program::Column::ChannelId.eq(channel_id))
            .filter(epg_program::Column::StartTime.gte(from))
            .filter(epg_program::Column::EndTime.lte(to))
            .order_by_asc(epg_program::Column::StartTime)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn programs_for_channel(&self, channel_id: &str) -> Result<Vec<EpgProgram>> {
        let rows = EpgPrograms::find()
            .filter(epg_program::Column::ChannelId.eq(channel_id))
            .order_by_asc(epg_program::Column::StartTime)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Everything on air at the given instant, across all channels.
    pub async fn current_programs(&self, at: i64) -> Result<Vec<EpgProgram>> {
        let rows = EpgPrograms::find()
            .filter(epg_program::Column::StartTime.lte(at))
            .filter(epg_program::Column::EndTime.gte(at))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<EpgProgram>> {
        let row = EpgPrograms::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn upsert_many(&self, programs: &[EpgProgram]) -> Result<()> {
        if programs.is_empty() {
            return Ok(());
        }
        EpgPrograms::insert_many(programs.iter().map(Self::active_model))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        info!("Stored {} EPG programmes", programs.len());
        Ok(())
    }

    pub async fn upsert(&self, program: &EpgProgram) -> Result<()> {
        EpgPrograms::insert(Self::active_model(program))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Update by id; a missing row is a silent no-op.
    pub async fn update(&self, program: &EpgProgram) -> Result<()> {
        match EpgPrograms::update(Self::active_model(program))
            .exec(&self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = EpgPrograms::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_channel(&self, channel_id: &str) -> Result<u64> {
        let result = EpgPrograms::delete_many()
            .filter(epg_program::Column::ChannelId.eq(channel_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Drops programmes that ended strictly before the cutoff.
    pub async fn prune_before(&self, cutoff: i64) -> Result<u64> {
        let result = EpgPrograms::delete_many()
            .filter(epg_program::Column::EndTime.lt(cutoff))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = EpgPrograms::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
