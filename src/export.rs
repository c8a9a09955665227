//! Export lanes for the canonical event stream: csv, json, parquet and
//! xlsx. Every lane emits the same fixed column superset across leagues,
//! with absent fields as empty/null cells.

use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parquet::data_type::{BoolType, ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::schema::parser::parse_message_type;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::event::{CanonicalEvent, MAX_ON_ICE, Participant};

const PARTICIPANT_ATTRS: [&str; 6] = [
    "id",
    "jersey_number",
    "first_name",
    "last_name",
    "team",
    "team_id",
];

pub fn write_json(rows: &[CanonicalEvent], path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), rows)
        .with_context(|| format!("failed writing json to {}", path.display()))
}

pub fn write_csv(rows: &[CanonicalEvent], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    writer
        .write_record(column_headers())
        .context("failed writing csv header")?;
    for ev in rows {
        writer
            .write_record(row_cells(ev))
            .context("failed writing csv row")?;
    }
    writer.flush().context("failed flushing csv")?;
    Ok(())
}

pub fn write_xlsx(rows: &[CanonicalEvent], path: &Path) -> Result<()> {
    let mut grid = vec![column_headers()];
    grid.extend(rows.iter().map(row_cells));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("events").context("failed naming sheet")?;
    write_rows(sheet, &grid)?;
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .context("failed writing cell")?;
        }
    }
    Ok(())
}

pub fn column_headers() -> Vec<String> {
    let mut headers: Vec<String> = [
        "game_id",
        "league",
        "event",
        "event_detail",
        "period",
        "elapsed_seconds",
        "event_team",
        "event_team_id",
        "is_home",
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    for slot in 1..=3 {
        push_participant_headers(&mut headers, &format!("player{slot}"));
    }
    push_participant_headers(&mut headers, "goalie");
    for slot in 1..=MAX_ON_ICE {
        push_participant_headers(&mut headers, &format!("plus{slot}"));
    }
    for slot in 1..=MAX_ON_ICE {
        push_participant_headers(&mut headers, &format!("minus{slot}"));
    }

    headers.extend(
        [
            "n_plus",
            "n_minus",
            "home_skaters",
            "away_skaters",
            "x_location",
            "y_location",
            "x",
            "y",
            "x_norm",
            "y_norm",
            "shot_distance_ft",
            "shot_angle_deg",
            "shot_type",
            "shot_quality",
            "shot_quality_code",
            "goal_type",
            "is_goal",
            "score_home",
            "score_away",
            "order_idx",
            "scraped_on",
        ]
        .iter()
        .map(ToString::to_string),
    );
    headers
}

fn push_participant_headers(headers: &mut Vec<String>, prefix: &str) {
    for attr in PARTICIPANT_ATTRS {
        headers.push(format!("{prefix}_{attr}"));
    }
}

fn row_cells(ev: &CanonicalEvent) -> Vec<String> {
    let mut cells = vec![
        ev.game_id.to_string(),
        ev.league.code().to_string(),
        ev.event.as_str().to_string(),
        fmt_opt(ev.event_detail.as_ref()),
        fmt_opt(ev.period.as_ref()),
        fmt_opt(ev.elapsed_seconds.as_ref()),
        fmt_opt(ev.event_team.as_ref()),
        fmt_opt(ev.event_team_id.as_ref()),
        fmt_opt(ev.is_home.as_ref()),
    ];

    for slot in &ev.players {
        push_participant_cells(&mut cells, slot.as_ref());
    }
    push_participant_cells(&mut cells, ev.goalie.as_ref());
    for slot in &ev.plus {
        push_participant_cells(&mut cells, slot.as_ref());
    }
    for slot in &ev.minus {
        push_participant_cells(&mut cells, slot.as_ref());
    }

    cells.extend([
        fmt_opt(ev.n_plus.as_ref()),
        fmt_opt(ev.n_minus.as_ref()),
        fmt_opt(ev.home_skaters.as_ref()),
        fmt_opt(ev.away_skaters.as_ref()),
        fmt_opt(ev.x_location.as_ref()),
        fmt_opt(ev.y_location.as_ref()),
        fmt_opt(ev.x.as_ref()),
        fmt_opt(ev.y.as_ref()),
        fmt_opt(ev.x_norm.as_ref()),
        fmt_opt(ev.y_norm.as_ref()),
        fmt_opt(ev.shot_distance_ft.as_ref()),
        fmt_opt(ev.shot_angle_deg.as_ref()),
        fmt_opt(ev.shot_type.as_ref()),
        fmt_opt(ev.shot_quality.as_ref()),
        fmt_opt(ev.shot_quality_code.as_ref()),
        fmt_opt(ev.goal_type.as_ref()),
        fmt_opt(ev.is_goal.as_ref()),
        fmt_opt(ev.score_home.as_ref()),
        fmt_opt(ev.score_away.as_ref()),
        ev.order_idx.to_string(),
        ev.scraped_on.to_rfc3339(),
    ]);
    cells
}

fn push_participant_cells(cells: &mut Vec<String>, participant: Option<&Participant>) {
    match participant {
        Some(p) => {
            cells.push(fmt_opt(p.id.as_ref()));
            cells.push(fmt_opt(p.jersey_number.as_ref()));
            cells.push(fmt_opt(p.first_name.as_ref()));
            cells.push(fmt_opt(p.last_name.as_ref()));
            cells.push(fmt_opt(p.team.as_ref()));
            cells.push(fmt_opt(p.team_id.as_ref()));
        }
        None => cells.extend(std::iter::repeat_n(String::new(), PARTICIPANT_ATTRS.len())),
    }
}

fn fmt_opt<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

// The parquet lane carries the scalar analytics columns; participant
// slots stay in the csv/json/xlsx lanes.
const PARQUET_SCHEMA: &str = "
message canonical_event {
    REQUIRED INT64 game_id;
    REQUIRED BYTE_ARRAY league (UTF8);
    REQUIRED BYTE_ARRAY event (UTF8);
    OPTIONAL BYTE_ARRAY event_detail (UTF8);
    OPTIONAL INT64 period;
    OPTIONAL INT64 elapsed_seconds;
    OPTIONAL BYTE_ARRAY event_team (UTF8);
    OPTIONAL INT64 event_team_id;
    OPTIONAL BOOLEAN is_home;
    OPTIONAL DOUBLE x_location;
    OPTIONAL DOUBLE y_location;
    OPTIONAL DOUBLE x;
    OPTIONAL DOUBLE y;
    OPTIONAL DOUBLE x_norm;
    OPTIONAL DOUBLE y_norm;
    OPTIONAL DOUBLE shot_distance_ft;
    OPTIONAL DOUBLE shot_angle_deg;
    OPTIONAL BYTE_ARRAY shot_type (UTF8);
    OPTIONAL BYTE_ARRAY shot_quality (UTF8);
    OPTIONAL BYTE_ARRAY goal_type (UTF8);
    OPTIONAL BOOLEAN is_goal;
    OPTIONAL INT64 score_home;
    OPTIONAL INT64 score_away;
    REQUIRED INT64 order_idx;
    REQUIRED BYTE_ARRAY scraped_on (UTF8);
}
";

pub fn write_parquet(rows: &[CanonicalEvent], path: &Path) -> Result<()> {
    let schema =
        Arc::new(parse_message_type(PARQUET_SCHEMA).context("invalid parquet schema")?);
    let props = Arc::new(WriterProperties::builder().build());
    let file = fs::File::create(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    let mut writer =
        SerializedFileWriter::new(file, schema, props).context("open parquet writer")?;
    let mut group = writer.next_row_group().context("open parquet row group")?;

    req_i64_column(&mut group, rows.iter().map(|r| r.game_id).collect())?;
    req_utf8_column(
        &mut group,
        rows.iter().map(|r| r.league.code().to_string()).collect(),
    )?;
    req_utf8_column(
        &mut group,
        rows.iter().map(|r| r.event.as_str().to_string()).collect(),
    )?;
    opt_utf8_column(
        &mut group,
        rows.iter().map(|r| r.event_detail.clone()).collect(),
    )?;
    opt_i64_column(
        &mut group,
        rows.iter().map(|r| r.period.map(i64::from)).collect(),
    )?;
    opt_i64_column(&mut group, rows.iter().map(|r| r.elapsed_seconds).collect())?;
    opt_utf8_column(&mut group, rows.iter().map(|r| r.event_team.clone()).collect())?;
    opt_i64_column(&mut group, rows.iter().map(|r| r.event_team_id).collect())?;
    opt_bool_column(&mut group, rows.iter().map(|r| r.is_home).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.x_location).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.y_location).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.x).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.y).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.x_norm).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.y_norm).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.shot_distance_ft).collect())?;
    opt_f64_column(&mut group, rows.iter().map(|r| r.shot_angle_deg).collect())?;
    opt_utf8_column(&mut group, rows.iter().map(|r| r.shot_type.clone()).collect())?;
    opt_utf8_column(
        &mut group,
        rows.iter().map(|r| r.shot_quality.clone()).collect(),
    )?;
    opt_utf8_column(&mut group, rows.iter().map(|r| r.goal_type.clone()).collect())?;
    opt_bool_column(&mut group, rows.iter().map(|r| r.is_goal).collect())?;
    opt_i64_column(
        &mut group,
        rows.iter().map(|r| r.score_home.map(i64::from)).collect(),
    )?;
    opt_i64_column(
        &mut group,
        rows.iter().map(|r| r.score_away.map(i64::from)).collect(),
    )?;
    req_i64_column(&mut group, rows.iter().map(|r| r.order_idx as i64).collect())?;
    req_utf8_column(
        &mut group,
        rows.iter().map(|r| r.scraped_on.to_rfc3339()).collect(),
    )?;

    group.close().context("close parquet row group")?;
    writer.close().context("close parquet writer")?;
    Ok(())
}

fn req_i64_column(group: &mut SerializedRowGroupWriter<'_, fs::File>, values: Vec<i64>) -> Result<()> {
    let mut col = group
        .next_column()
        .context("parquet column open")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    col.typed::<Int64Type>()
        .write_batch(&values, None, None)
        .context("parquet int64 batch")?;
    col.close().context("parquet column close")?;
    Ok(())
}

fn opt_i64_column(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: Vec<Option<i64>>,
) -> Result<()> {
    let defs: Vec<i16> = values.iter().map(|v| i16::from(v.is_some())).collect();
    let present: Vec<i64> = values.into_iter().flatten().collect();
    let mut col = group
        .next_column()
        .context("parquet column open")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    col.typed::<Int64Type>()
        .write_batch(&present, Some(&defs), None)
        .context("parquet int64 batch")?;
    col.close().context("parquet column close")?;
    Ok(())
}

fn opt_f64_column(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: Vec<Option<f64>>,
) -> Result<()> {
    let defs: Vec<i16> = values.iter().map(|v| i16::from(v.is_some())).collect();
    let present: Vec<f64> = values.into_iter().flatten().collect();
    let mut col = group
        .next_column()
        .context("parquet column open")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    col.typed::<DoubleType>()
        .write_batch(&present, Some(&defs), None)
        .context("parquet double batch")?;
    col.close().context("parquet column close")?;
    Ok(())
}

fn opt_bool_column(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: Vec<Option<bool>>,
) -> Result<()> {
    let defs: Vec<i16> = values.iter().map(|v| i16::from(v.is_some())).collect();
    let present: Vec<bool> = values.into_iter().flatten().collect();
    let mut col = group
        .next_column()
        .context("parquet column open")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    col.typed::<BoolType>()
        .write_batch(&present, Some(&defs), None)
        .context("parquet bool batch")?;
    col.close().context("parquet column close")?;
    Ok(())
}

fn req_utf8_column(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: Vec<String>,
) -> Result<()> {
    let encoded: Vec<ByteArray> = values
        .into_iter()
        .map(|s| ByteArray::from(s.into_bytes()))
        .collect();
    let mut col = group
        .next_column()
        .context("parquet column open")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    col.typed::<ByteArrayType>()
        .write_batch(&encoded, None, None)
        .context("parquet utf8 batch")?;
    col.close().context("parquet column close")?;
    Ok(())
}

fn opt_utf8_column(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: Vec<Option<String>>,
) -> Result<()> {
    let defs: Vec<i16> = values.iter().map(|v| i16::from(v.is_some())).collect();
    let present: Vec<ByteArray> = values
        .into_iter()
        .flatten()
        .map(|s| ByteArray::from(s.into_bytes()))
        .collect();
    let mut col = group
        .next_column()
        .context("parquet column open")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    col.typed::<ByteArrayType>()
        .write_batch(&present, Some(&defs), None)
        .context("parquet utf8 batch")?;
    col.close().context("parquet column close")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::league::League;
    use chrono::Utc;

    fn sample_rows() -> Vec<CanonicalEvent> {
        let mut shot = CanonicalEvent::new(31171, League::Qmjhl, EventKind::Shot, 0, Utc::now());
        shot.period = Some(2);
        shot.elapsed_seconds = Some(1230);
        shot.event_team = Some("RIM".to_string());
        shot.x = Some(-83.33);
        shot.players[0] = Some(Participant {
            id: Some(9),
            last_name: Some("Shooter".to_string()),
            ..Default::default()
        });
        let mut goal = CanonicalEvent::new(31171, League::Qmjhl, EventKind::Goal, 1, Utc::now());
        goal.score_home = Some(1);
        goal.score_away = Some(0);
        vec![shot, goal]
    }

    #[test]
    fn header_and_row_widths_agree() {
        let headers = column_headers();
        for ev in sample_rows() {
            assert_eq!(row_cells(&ev).len(), headers.len());
        }
    }

    #[test]
    fn csv_round_trips_row_count_and_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.csv");
        let rows = sample_rows();
        write_csv(&rows, &path).expect("csv should write");

        let mut reader = csv::Reader::from_path(&path).expect("csv should read");
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().expect("records");
        assert_eq!(records.len(), rows.len());
        assert_eq!(&records[0][2], "shot");
        assert_eq!(&records[1][2], "goal");
    }

    #[test]
    fn json_preserves_ordering() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        write_json(&sample_rows(), &path).expect("json should write");
        let raw = std::fs::read_to_string(&path).expect("readable");
        let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        let events = parsed.as_array().expect("array");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "shot");
        assert_eq!(events[1]["score_home"], 1);
    }

    #[test]
    fn parquet_writes_without_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.parquet");
        write_parquet(&sample_rows(), &path).expect("parquet should write");
        assert!(path.metadata().expect("file exists").len() > 0);
    }

    #[test]
    fn xlsx_writes_without_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.xlsx");
        write_xlsx(&sample_rows(), &path).expect("xlsx should write");
        assert!(path.metadata().expect("file exists").len() > 0);
    }
}
