use scoutdeck_db::{assignments, matches, predictions, prelude::*, reports, teams};
use sea_orm::EntityTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn idx<E: EntityTrait>(s: &sea_orm::Schema, e: E) -> Vec<IndexCreateStatement> {
    s.create_index_from_entity(e)
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        let s = sea_orm::Schema::new(m.get_database_backend());
        m.create_table(s.create_table_from_entity(Accounts)).await?;
        m.create_table(s.create_table_from_entity(Profiles)).await?;
        m.create_table(s.create_table_from_entity(Achievements))
            .await?;
        m.create_table(s.create_table_from_entity(Events)).await?;
        m.create_table(s.create_table_from_entity(Teams)).await?;
        m.create_table(s.create_table_from_entity(Matches)).await?;
        m.create_table(s.create_table_from_entity(Assignments))
            .await?;
        m.create_table(s.create_table_from_entity(Reports)).await?;
        m.create_table(s.create_table_from_entity(Predictions))
            .await?;
        m.create_table(s.create_table_from_entity(TeamStats))
            .await?;
        m.create_table(s.create_table_from_entity(MatchStats))
            .await?;
        let s = &s;
        let all_idx = [
            idx(s, Accounts),
            idx(s, Profiles),
            idx(s, Achievements),
            idx(s, Events),
            idx(s, Teams),
            idx(s, Matches),
            idx(s, Assignments),
            idx(s, Reports),
            idx(s, Predictions),
            idx(s, TeamStats),
            idx(s, MatchStats),
        ]
        .into_iter()
        .flatten();
        for i in all_idx {
            m.create_index(i).await?;
        }

        // Composite uniqueness the entity derives cannot express.
        let mut team_number_event_index = Index::create();
        team_number_event_index
            .name("team-number-event-index")
            .unique()
            .table(Teams)
            .col(teams::Column::TeamNumber)
            .col(teams::Column::EventId);
        m.create_index(team_number_event_index).await?;

        let mut match_identity_index = Index::create();
        match_identity_index
            .name("match-identity-index")
            .unique()
            .table(Matches)
            .col(matches::Column::EventId)
            .col(matches::Column::MatchNumber)
            .col(matches::Column::MatchType)
            .col(matches::Column::CompLevel)
            .col(matches::Column::SetNumber);
        m.create_index(match_identity_index).await?;

        let mut assignment_position_index = Index::create();
        assignment_position_index
            .name("assignment-position-index")
            .unique()
            .table(Assignments)
            .col(assignments::Column::MatchId)
            .col(assignments::Column::Position);
        m.create_index(assignment_position_index).await?;

        let mut report_identity_index = Index::create();
        report_identity_index
            .name("report-identity-index")
            .unique()
            .table(Reports)
            .col(reports::Column::MatchId)
            .col(reports::Column::AccountId)
            .col(reports::Column::TeamId);
        m.create_index(report_identity_index).await?;

        let mut prediction_identity_index = Index::create();
        prediction_identity_index
            .name("prediction-identity-index")
            .unique()
            .table(Predictions)
            .col(predictions::Column::AccountId)
            .col(predictions::Column::MatchId);
        m.create_index(prediction_identity_index).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(MatchStats).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop match_stats"))?;
        m.drop_table(Table::drop().table(TeamStats).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop team_stats"))?;
        m.drop_table(Table::drop().table(Predictions).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop predictions"))?;
        m.drop_table(Table::drop().table(Reports).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop reports"))?;
        m.drop_table(Table::drop().table(Assignments).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop assignments"))?;
        m.drop_table(Table::drop().table(Matches).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop matches"))?;
        m.drop_table(Table::drop().table(Teams).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop teams"))?;
        m.drop_table(Table::drop().table(Events).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop events"))?;
        m.drop_table(Table::drop().table(Achievements).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop achievements"))?;
        m.drop_table(Table::drop().table(Profiles).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop profiles"))?;
        m.drop_table(Table::drop().table(Accounts).if_exists().to_owned())
            .await
            .inspect_err(log_err("drop accounts"))?;
        Ok(())
    }
}

fn log_err<'a>(ctx: &'a str) -> impl FnOnce(&DbErr) + 'a {
    move |e| {
        eprintln!("{ctx}: {e}");
    }
}
