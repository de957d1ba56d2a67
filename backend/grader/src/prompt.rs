//! Rubric prompt for the completion endpoint.

/// System persona sent with every grading request.
pub const SYSTEM_PERSONA: &str =
    "你是一位專業的中文作文批改老師，擅長根據台灣國中教育會考標準評分作文。";

/// Sampling temperature for grading requests.
pub const TEMPERATURE: f32 = 0.7;

/// Output token ceiling for grading requests.
pub const MAX_TOKENS: u32 = 2000;

/// Build the grading prompt: the essay embedded in the fixed instruction
/// block describing the four rubric categories, the six tier bands, and the
/// exact JSON shape the endpoint must answer with.
pub fn build_grading_prompt(essay: &str) -> String {
    format!(
        r#"請根據台灣國中教育會考的作文評分標準（零到六級分）批改以下作文，並提供結構化的評分結果。

作文內容：
{essay}

請以 JSON 格式回覆，包含以下項目：
{{
  "totalScore": 0-100 的總分,
  "gradeLevel": "一級分" 到 "六級分",
  "detailedScores": [
    {{
      "category": "立意取材",
      "score": 0-100,
      "comment": "評語"
    }},
    {{
      "category": "結構組織",
      "score": 0-100,
      "comment": "評語"
    }},
    {{
      "category": "遣詞造句",
      "score": 0-100,
      "comment": "評語"
    }},
    {{
      "category": "錯別字與標點符號",
      "score": 0-100,
      "comment": "評語"
    }}
  ],
  "errors": [
    {{
      "original": "錯誤的詞句",
      "correction": "修正建議",
      "explanation": "說明"
    }}
  ],
  "highlights": [
    {{
      "text": "優秀的詞句",
      "comment": "點評"
    }}
  ],
  "structure": {{
    "opening": "開頭分析與建議",
    "development": "發展段落分析與建議",
    "conclusion": "結尾分析與建議"
  }},
  "overallComment": "總評"
}}

請注意：
1. 六級分：90-100分，優秀作品
2. 五級分：80-89分，良好作品
3. 四級分：70-79分，中等偏上
4. 三級分：60-69分，中等
5. 二級分：50-59分，待加強
6. 一級分：0-49分，需大幅改進

請提供詳細且建設性的評語。"#
    )
}
