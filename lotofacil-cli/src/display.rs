use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportSummary;
use lotofacil_core::analysis::HistoricalMetrics;
use lotofacil_core::evaluator::{GameAnalysis, COLD_DELAY_THRESHOLD, HOT_FREQUENCY_THRESHOLD};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_import_summary(summary: &ImportSummary) {
    println!("Import finished:");
    println!("  Records read : {}", summary.total_records);
    println!("  Accepted     : {}", summary.accepted);
    if summary.rejected > 0 {
        println!("  Rejected     : {}", summary.rejected);
    }
}

pub fn display_stats(metrics: &HistoricalMetrics) {
    println!("\n📊 Statistics over {} draws\n", metrics.draw_count());

    let mut table = new_table(vec!["Number", "Frequency", "Delay", "Score", "Tag"]);
    let mut rows = metrics.number_stats();
    rows.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    for row in &rows {
        let (tag, color) = if row.frequency > HOT_FREQUENCY_THRESHOLD {
            ("HOT", Color::Green)
        } else if row.delay > COLD_DELAY_THRESHOLD {
            ("COLD", Color::Red)
        } else {
            ("-", Color::White)
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", row.number)),
            Cell::new(row.frequency),
            Cell::new(row.delay),
            Cell::new(format!("{:.4}", row.score)),
            Cell::new(tag).fg(color),
        ]);
    }
    println!("{table}");

    println!("\n── Top sequences ──");
    let mut table = new_table(vec!["#", "Sequence", "Frequency"]);
    for (i, seq) in metrics.sequences().iter().enumerate() {
        let joined = seq
            .sequence
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join("-");
        table.add_row(vec![
            &format!("{}", i + 1),
            &joined,
            &seq.frequency.to_string(),
        ]);
    }
    println!("{table}");

    println!("\n── Even/odd splits ──");
    let mut table = new_table(vec!["Evens", "Odds", "Frequency"]);
    for combo in metrics.even_odd_combinations() {
        table.add_row(vec![
            &combo.evens.to_string(),
            &combo.odds.to_string(),
            &combo.frequency.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_recommendation(analysis: &GameAnalysis) {
    println!("\n🎲 RECOMMENDED GAME ({} NUMBERS):", analysis.game.len());
    println!("{}", analysis.game);

    println!("\nSTATISTICS:");
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec!["Evens".to_string(), analysis.evens.to_string()]);
    table.add_row(vec!["Odds".to_string(), analysis.odds.to_string()]);
    for range in analysis.labeled_ranges() {
        table.add_row(vec![format!("Range {}", range.range), range.count.to_string()]);
    }
    table.add_row(vec!["Sequences".to_string(), analysis.sequence_count.to_string()]);
    table.add_row(vec!["Hot".to_string(), analysis.hot_numbers.to_string()]);
    table.add_row(vec!["Cold".to_string(), analysis.cold_numbers.to_string()]);
    table.add_row(vec!["Average score".to_string(), format!("{:.4}", analysis.avg_score)]);
    println!("{table}");
}

pub fn display_candidates(candidates: &[GameAnalysis]) {
    println!("\n🎯 Candidates (best first)\n");

    let mut table = new_table(vec!["#", "Game", "E/O", "Seq", "Hot", "Cold", "Avg score"]);
    let mut sorted: Vec<&GameAnalysis> = candidates.iter().collect();
    // Stable sort keeps generation order among equal scores.
    sorted.sort_by(|a, b| b.avg_score.partial_cmp(&a.avg_score).unwrap_or(std::cmp::Ordering::Equal));

    for (i, c) in sorted.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            c.game.to_string(),
            format!("{}/{}", c.evens, c.odds),
            c.sequence_count.to_string(),
            c.hot_numbers.to_string(),
            c.cold_numbers.to_string(),
            format!("{:.4}", c.avg_score),
        ]);
    }
    println!("{table}");
}
