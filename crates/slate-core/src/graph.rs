//! Expanding parsed match weeks into the full schedule graph.
//!
//! For a season this writes, in order: the season row (if absent), a season
//! schedule group, and per week a week row, a week schedule group and their
//! bridge. Per fixture it writes both fixture rows and their bridge, then one
//! match parent, match and series for every skill group × game mode.

use tracing::{debug, info};

use crate::{
  Error, Result,
  entity::{
    GAME_ID, NewLeagueFixture, NewMatch, NewScheduleFixture, NewScheduleGroup,
    NewSeries, NewWeek, RowId, ScheduleGroupType, Season,
  },
  franchise::FranchiseMap,
  league::{GameMode, SkillGroup},
  schedule::{FixtureRow, MatchWeek},
  store::ScheduleTx,
};

/// Row counts staged by [`build_schedule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  /// `false` when the season row already existed.
  pub season_created:  bool,
  pub schedule_groups: usize,
  pub weeks:           usize,
  pub fixtures:        usize,
  pub match_parents:   usize,
  pub matches:         usize,
  pub series:          usize,
}

/// Stage the whole schedule for `season_number` through `tx`.
///
/// The season spans the first week's start to the last week's end, in the
/// order given; `weeks` is expected to be chronological already. The caller
/// owns the transaction and decides whether to commit.
pub async fn build_schedule<T: ScheduleTx>(
  tx: &mut T,
  season_number: i32,
  game_modes: &[GameMode],
  weeks: &[MatchWeek],
  franchises: &FranchiseMap,
) -> Result<ImportReport> {
  let mut report = ImportReport::default();

  let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
    return Ok(report);
  };
  let season_start = first.start_date;
  let season_end = last.end_date;

  info!(season = season_number, "creating season");

  let existing = tx.find_season(season_number).await.map_err(Error::store)?;
  if existing.is_none() {
    tx.insert_season(&Season {
      season_number,
      start_date: season_start,
      end_date: season_end,
    })
    .await
    .map_err(Error::store)?;
    report.season_created = true;
  } else {
    debug!(season = season_number, "season row already exists");
  }

  // Created on every run, even when the season row already existed.
  let season_group_id = tx
    .insert_schedule_group(&NewScheduleGroup {
      start:           season_start,
      end:             season_end,
      description:     format!("Season {season_number}"),
      group_type:      ScheduleGroupType::Season,
      game_id:         GAME_ID,
      parent_group_id: None,
    })
    .await
    .map_err(Error::store)?;
  report.schedule_groups += 1;

  for week in weeks {
    info!(week = week.match_number, fixtures = week.fixtures.len(), "processing week");

    let week_id = tx
      .insert_week(&NewWeek {
        from_date:        week.start_date,
        to_date:          week.end_date,
        season:           season_number,
        match_number:     week.match_number,
        is_double_header: false,
      })
      .await
      .map_err(Error::store)?;
    report.weeks += 1;

    let group_id = tx
      .insert_schedule_group(&NewScheduleGroup {
        start:           week.start_date,
        end:             week.end_date,
        description:     format!("Week {}", week.match_number),
        group_type:      ScheduleGroupType::Week,
        game_id:         GAME_ID,
        parent_group_id: Some(season_group_id),
      })
      .await
      .map_err(Error::store)?;
    report.schedule_groups += 1;

    tx.link_week(week_id, group_id).await.map_err(Error::store)?;

    for fixture in &week.fixtures {
      build_fixture(
        tx,
        week_id,
        group_id,
        fixture,
        game_modes,
        franchises,
        &mut report,
      )
      .await?;
    }
  }

  Ok(report)
}

async fn build_fixture<T: ScheduleTx>(
  tx: &mut T,
  week_id: RowId,
  group_id: RowId,
  fixture: &FixtureRow,
  game_modes: &[GameMode],
  franchises: &FranchiseMap,
  report: &mut ImportReport,
) -> Result<()> {
  let home_franchise_id = franchises.resolve(&fixture.home)?;
  let away_franchise_id = franchises.resolve(&fixture.away)?;

  let schedule_fixture_id = tx
    .insert_schedule_fixture(&NewScheduleFixture {
      schedule_group_id: group_id,
      home_franchise_id,
      away_franchise_id,
    })
    .await
    .map_err(Error::store)?;

  let league_fixture_id = tx
    .insert_league_fixture(&NewLeagueFixture {
      match_id:  week_id,
      home_name: fixture.home.clone(),
      away_name: fixture.away.clone(),
    })
    .await
    .map_err(Error::store)?;

  tx.link_fixtures(league_fixture_id, schedule_fixture_id)
    .await
    .map_err(Error::store)?;
  report.fixtures += 1;

  for skill_group in SkillGroup::for_fixture(fixture.has_premier) {
    for &game_mode in game_modes {
      let match_parent_id = tx
        .insert_match_parent(schedule_fixture_id)
        .await
        .map_err(Error::store)?;
      report.match_parents += 1;

      tx.insert_match(&NewMatch { match_parent_id, skill_group, game_mode })
        .await
        .map_err(Error::store)?;
      report.matches += 1;

      tx.insert_series(&NewSeries {
        fixture_id: league_fixture_id,
        league:     skill_group,
        mode:       game_mode,
      })
      .await
      .map_err(Error::store)?;
      report.series += 1;
    }
  }

  Ok(())
}
