//! Plain-terminal rendering of grading records.

use redpen_core::{GradeTier, GradingRecord};

/// First few characters of the essay, for one-line listings.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out
}

/// Print one record in full, in the result-page section order.
pub fn print_record(record: &GradingRecord) {
    let result = &record.payload;
    let tier = GradeTier::from_score(result.total_score);

    println!();
    println!("編號：{}", record.id);
    println!("時間：{}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!("總分：{} 分（{}）", result.total_score, tier);
    println!();

    println!("分項評分");
    for item in &result.detailed_scores {
        println!("  {}: {}/100", item.category, item.score);
        println!("    {}", item.comment);
    }

    if !result.errors.is_empty() {
        println!();
        println!("錯別字與病句");
        for (index, error) in result.errors.iter().enumerate() {
            println!("  {}. {} → {}", index + 1, error.original, error.correction);
            println!("     {}", error.explanation);
        }
    }

    if !result.highlights.is_empty() {
        println!();
        println!("佳句");
        for highlight in &result.highlights {
            println!("  「{}」", highlight.text);
            println!("    {}", highlight.comment);
        }
    }

    println!();
    println!("結構分析");
    println!("  開頭：{}", result.structure.opening);
    println!("  發展：{}", result.structure.development);
    println!("  結尾：{}", result.structure.conclusion);

    println!();
    println!("總評");
    println!("  {}", result.overall_comment);
}
