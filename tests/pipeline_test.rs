use async_trait::async_trait;
use scorecard_engine::clients::SheetSource;
use scorecard_engine::error::FetchError;
use scorecard_engine::models::{
    load_catalog_file, Diagnostic, ExamCatalog, QuestionStatus, SheetFormat,
};
use scorecard_engine::services::image_resolver::toggle_language;
use scorecard_engine::services::FetchService;
use scorecard_engine::{ScorecardFlow, SheetCtx};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("无法读取测试文件 {}: {}", path.display(), e))
}

async fn fixture_flow() -> ScorecardFlow {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog/fixture_exams.toml");
    let custom = load_catalog_file(&path).await.expect("加载测试目录失败");
    ScorecardFlow::new(
        Arc::new(ExamCatalog::builtin().with_custom(custom)),
        "FIXTURE_MAINS",
    )
}

#[tokio::test]
async fn test_view_candidate_response_sheet() {
    let flow = fixture_flow().await;
    let data = flow
        .run(&fixture("view_cand_response.html"), &SheetCtx::new(1, "vcr"))
        .unwrap();

    assert_eq!(data.format, SheetFormat::ViewCandidateResponse);
    let candidate = data.candidate_info.as_ref().expect("缺少考生信息");
    assert_eq!(candidate.roll_number, "2201234567");
    assert_eq!(candidate.candidate_name, "ASHA KUMARI");
    assert_eq!(candidate.venue_name, "iON Digital Zone Noida");

    // 第六个单元格缺少元数据表，被跳过且不占用编号
    let numbers: Vec<u32> = data.questions.iter().map(|q| q.sequential_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    let statuses: Vec<QuestionStatus> = data.questions.iter().map(|q| q.status).collect();
    assert_eq!(
        statuses,
        vec![
            QuestionStatus::Correct,
            QuestionStatus::Wrong,
            QuestionStatus::Unattempted,
            QuestionStatus::Bonus,
            QuestionStatus::Bonus,
            QuestionStatus::Correct,
        ]
    );

    let reasoning = &data.sections[0];
    assert_eq!((reasoning.correct, reasoning.wrong, reasoning.skipped), (1, 1, 1));
    assert_eq!(reasoning.score, 1.5);
    assert_eq!(data.sections[1].bonus, 2);
    assert_eq!(data.sections[1].score, 4.0);

    // 资格科目单独给出，不计入总分
    let qualifying = data.qualifying_section.as_ref().expect("缺少资格科目");
    assert_eq!(qualifying.score, 1.0);
    assert_eq!(data.totals.total_score, 5.5);
    assert_eq!(data.totals.total_max_marks, 10.0);
    assert_eq!(data.totals.total_correct, 1);

    assert!(data.unmapped_section.is_none());
    assert!(!data
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::QuestionCountMismatch { .. })));
}

#[tokio::test]
async fn test_image_urls_and_bilingual_variants() {
    let flow = fixture_flow().await;
    let data = flow
        .run(&fixture("view_cand_response.html"), &SheetCtx::default())
        .unwrap();

    let first = &data.questions[0];
    let hindi = "https://ssc.digialm.com/per/g27/pub/2207/touchstone/AssessmentQPHTMLMode1/q1_HI.jpg";
    assert_eq!(first.image_url.as_deref(), Some(hindi));
    assert_eq!(first.bilingual.hindi_url.as_deref(), Some(hindi));
    assert_eq!(
        first.bilingual.english_url.as_deref(),
        Some("https://ssc.digialm.com/per/g27/pub/2207/touchstone/AssessmentQPHTMLMode1/q1_EN.jpg")
    );

    let english = toggle_language(hindi).unwrap();
    assert_eq!(toggle_language(&english).as_deref(), Some(hindi));

    let chosen: Vec<u32> = first
        .options
        .iter()
        .filter(|o| o.is_chosen)
        .map(|o| o.option_number)
        .collect();
    assert_eq!(chosen, vec![2]);
    assert!(first.options[1].image_url.as_deref().unwrap().ends_with("q1o2.jpg"));
}

#[tokio::test]
async fn test_questions_for_section() {
    let flow = fixture_flow().await;
    let data = flow
        .run(&fixture("view_cand_response.html"), &SheetCtx::default())
        .unwrap();

    let english: Vec<u32> = data
        .questions_for_section("B")
        .iter()
        .map(|q| q.section_local_number)
        .collect();
    assert_eq!(english, vec![1, 2]);
    assert!(data.questions_for_section("Z").is_empty());
}

#[tokio::test]
async fn test_assessment_table_sheet() {
    let flow = fixture_flow().await;
    let ctx = SheetCtx::new(2, "colored").with_exam(Some("FIXTURE_QUIZ".to_string()));
    let data = flow.run(&fixture("assessment_table.html"), &ctx).unwrap();

    assert_eq!(data.format, SheetFormat::AssessmentTable);
    let candidate = data.candidate_info.as_ref().unwrap();
    assert_eq!(candidate.roll_number, "9100456789");
    assert_eq!(candidate.candidate_name, "RAVI SHANKAR");
    assert_eq!(candidate.shift, "Shift 2");

    // 第 4 题没有选项行，被跳过
    let local: Vec<u32> = data.questions.iter().map(|q| q.section_local_number).collect();
    assert_eq!(local, vec![1, 2, 3, 5]);

    assert_eq!(data.questions[0].status, QuestionStatus::Correct);
    assert!(data.questions[0].chosen_inferred);
    // 红色行与绿色行同时出现：答错
    assert_eq!(data.questions[1].status, QuestionStatus::Wrong);
    assert_eq!(data.questions[1].chosen_option, Some(2));
    assert_eq!(data.questions[1].correct_option, Some(3));
    assert!(!data.questions[1].chosen_inferred);
    // 单元格上的颜色同样有效
    assert_eq!(data.questions[2].correct_option, Some(2));
    // 没有任何标记：作废题
    assert_eq!(data.questions[3].status, QuestionStatus::Bonus);

    assert_eq!(data.totals.total_score, 2.75);
    assert!(data.has_diagnostic(&Diagnostic::ChosenOptionInferred { count: 2 }));

    let english = data.questions[0].bilingual.english_url.as_deref().unwrap();
    assert!(english.starts_with("https://ssc.digialm.com/per/g27/pub/2207/touchstone/"));
    assert!(data.questions[0].bilingual.hindi_url.as_deref().unwrap().ends_with("a1_HI.jpg"));
}

#[tokio::test]
async fn test_scorecard_json_shape() {
    let flow = fixture_flow().await;
    let data = flow
        .run(&fixture("view_cand_response.html"), &SheetCtx::default())
        .unwrap();
    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(json["candidateInfo"]["rollNumber"], "2201234567");
    assert_eq!(json["format"], "viewCandidateResponse");
    assert_eq!(json["totalScore"], 5.5);
    assert_eq!(json["qualifyingSection"]["isQualifying"], true);
    assert_eq!(json["questions"][3]["status"], "bonus");
    assert_eq!(json["questions"][0]["sequentialNumber"], 1);
    assert!(json["questions"][0]["bilingual"]["englishUrl"].is_string());
}

#[tokio::test]
async fn test_garbage_input_yields_empty_scorecard() {
    let flow = fixture_flow().await;
    let data = flow
        .run("<html><body><h1>Login</h1><form></form></body></html>", &SheetCtx::default())
        .unwrap();

    assert!(data.questions.is_empty());
    assert!(data.sections.iter().all(|s| s.score == 0.0));
    assert!(data.has_diagnostic(&Diagnostic::NoQuestionsFound));
    assert!(data.has_diagnostic(&Diagnostic::CandidateInfoMissing));
}

/// 按地址返回测试文件的假路线
struct FixtureRoute {
    pages: HashMap<String, String>,
}

#[async_trait]
impl SheetSource for FixtureRoute {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::RouteFailed {
                route: self.name().to_string(),
                reason: "404".to_string(),
            })
    }
}

#[tokio::test]
async fn test_multi_part_numbering_continues_across_parts() {
    let base = "https://ssc.digialm.com/per/g27/pub/2207/touchstone/";
    let first = format!("{}ViewCandResponse.aspx", base);
    let pages = HashMap::from([
        (first.clone(), fixture("multi_part_1.html")),
        (format!("{}ViewCandResponse2.aspx", base), fixture("multi_part_2.html")),
    ]);
    let service = FetchService::new(vec![Box::new(FixtureRoute { pages })]);

    let html = service.fetch_sheet(&first).await.unwrap();

    let flow = fixture_flow().await;
    let ctx = SheetCtx::new(1, "multi")
        .with_exam(Some("FIXTURE_QUIZ".to_string()))
        .with_source_url(Some(first.clone()));
    let data = flow.run(&html, &ctx).unwrap();

    let numbering: Vec<(u32, u32)> = data
        .questions
        .iter()
        .map(|q| (q.sequential_number, q.section_local_number))
        .collect();
    assert_eq!(numbering, vec![(1, 1), (2, 2), (3, 1), (4, 2)]);
    assert_eq!(data.candidate_info.as_ref().unwrap().candidate_name, "MEERA DAS");
    // 1 + 1 - 0.25
    assert_eq!(data.totals.total_score, 1.75);
    assert_eq!(data.totals.total_skipped, 1);
}

#[tokio::test]
async fn test_fetch_outcome_for_unsupported_url() {
    let service = FetchService::new(Vec::new());
    let outcome = service.fetch("https://example.com/result").await;

    assert!(!outcome.success);
    assert!(outcome.html.is_none());
    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json.get("html").is_none());
    assert!(json["error"].as_str().unwrap().contains("example.com"));
}
