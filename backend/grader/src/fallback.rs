//! Deterministic offline grading generator.
//!
//! Stands in for the completion endpoint whenever it is unavailable or
//! fails non-fatally. Same text in, same result out: the category jitter
//! is a function of the input, not a random source.

use redpen_core::{
    CategoryScore, ErrorNote, GradeTier, GradingPayload, Highlight, StructureReview,
};

const CATEGORIES: [(&str, &str); 4] = [
    (
        "立意取材",
        "主題明確，取材恰當，能夠扣緊題旨發揮。建議可以加入更多生活實例來支持論點。",
    ),
    (
        "結構組織",
        "段落分明，結構完整。起承轉合安排得宜，但轉折處可以更加流暢。",
    ),
    (
        "遣詞造句",
        "用詞恰當，句型富有變化。部分句子可以精簡，避免冗贅。",
    ),
    (
        "錯別字與標點符號",
        "錯別字較少，標點符號使用大致正確。注意句號與逗號的區別。",
    ),
];

/// Base score from essay length: 60 plus one point per 20 characters,
/// capped at 85.
pub fn base_score(length: usize) -> u8 {
    (60 + length / 20).min(85) as u8
}

// Deterministic stand-in for random jitter, same [-5, 4] range.
fn perturb(base: u8, category_index: usize, length: usize) -> u8 {
    let offset = ((length + category_index * 7) % 10) as i32 - 5;
    (base as i32 + offset).clamp(0, 100) as u8
}

fn overall_comment(base: u8) -> String {
    let quality = if base >= 80 { "優秀" } else { "不錯" };
    format!(
        "這是一篇{quality}的作文。文章立意清晰，結構完整，能夠扣緊主題發揮。\
         用詞恰當，句型富有變化。建議在以下方面繼續努力：\
         一、增加具體事例的描寫，使論述更加生動；\
         二、注意段落間的銜接，使文章更加流暢；\
         三、適當運用修辭手法，提升文章的文學性。\
         持續練習，相信你的寫作能力會更上一層樓！"
    )
}

/// Generate a complete grading result for `essay` without the endpoint.
pub fn mock_grading_result(essay: &str) -> GradingPayload {
    let length = essay.chars().count();
    let base = base_score(length);

    let detailed_scores = CATEGORIES
        .iter()
        .enumerate()
        .map(|(index, &(category, comment))| CategoryScore {
            category: category.to_string(),
            score: perturb(base, index, length),
            comment: comment.to_string(),
        })
        .collect();

    let highlight_text: String = essay.chars().take(30).collect();

    GradingPayload {
        original_text: essay.to_string(),
        total_score: base,
        grade_level: GradeTier::from_score(base),
        detailed_scores,
        errors: vec![
            ErrorNote {
                original: "應該".to_string(),
                correction: "應當".to_string(),
                explanation: "在正式寫作中，「應當」比「應該」更為適當".to_string(),
            },
            ErrorNote {
                original: "很好".to_string(),
                correction: "優秀、出色".to_string(),
                explanation: "避免使用過於口語化的詞彙，可以使用更精確的形容詞".to_string(),
            },
        ],
        highlights: vec![Highlight {
            text: highlight_text,
            comment: "開頭引人入勝，能夠吸引讀者的注意力".to_string(),
        }],
        structure: StructureReview {
            opening: "開頭點題明確，能夠引起讀者興趣。建議可以使用修辭手法（如排比、設問等）\
                      來增強開頭的吸引力。"
                .to_string(),
            development: "發展段落內容充實，論述清晰。建議在段落之間增加轉折語，使文章更加連貫。\
                          可以加入更多具體事例來支持論點。"
                .to_string(),
            conclusion: "結尾能夠呼應開頭，總結全文。可以在結尾處加入對未來的展望或個人的深刻體會，\
                         使結尾更有力量。"
                .to_string(),
        },
        overall_comment: overall_comment(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_score_bounds() {
        for length in [0usize, 1, 19, 20, 399, 400, 500, 10_000] {
            let base = base_score(length);
            assert!((60..=85).contains(&base), "length {length} gave {base}");
            assert_eq!(base as usize, (60 + length / 20).min(85));
        }
    }

    #[test]
    fn test_empty_essay_still_grades() {
        let payload = mock_grading_result("");
        assert_eq!(payload.total_score, 60);
        assert_eq!(payload.grade_level, GradeTier::Tier3);
        assert_eq!(payload.highlights[0].text, "");
        assert_eq!(payload.detailed_scores.len(), 4);
    }

    #[test]
    fn test_500_char_essay_caps_at_85_tier5() {
        let essay: String = std::iter::repeat('字').take(500).collect();
        let payload = mock_grading_result(&essay);
        assert_eq!(payload.total_score, 85);
        assert_eq!(payload.grade_level, GradeTier::Tier5);
    }

    #[test]
    fn test_highlight_is_opening_substring() {
        let essay = "春眠不覺曉，處處聞啼鳥。夜來風雨聲，花落知多少。古詩雖短，意境深遠。";
        let payload = mock_grading_result(essay);
        let expected: String = essay.chars().take(30).collect();
        assert_eq!(payload.highlights[0].text, expected);
    }

    #[test]
    fn test_category_scores_stay_near_base_and_in_range() {
        let essay: String = std::iter::repeat('好').take(123).collect();
        let payload = mock_grading_result(&essay);
        let base = payload.total_score as i32;
        for entry in &payload.detailed_scores {
            let delta = entry.score as i32 - base;
            assert!((-5..=4).contains(&delta), "{}: {delta}", entry.category);
        }
    }

    #[test]
    fn test_generator_is_deterministic() {
        let essay = "一篇用來驗證重複呼叫結果一致的作文。";
        assert_eq!(mock_grading_result(essay), mock_grading_result(essay));
    }

    #[test]
    fn test_overall_comment_wording_branches_on_base() {
        // 60 chars → base 63; 500 chars → base 85
        let short: String = std::iter::repeat('短').take(60).collect();
        assert!(mock_grading_result(&short).overall_comment.contains("不錯"));
        let long: String = std::iter::repeat('長').take(500).collect();
        assert!(mock_grading_result(&long).overall_comment.contains("優秀"));
    }
}
