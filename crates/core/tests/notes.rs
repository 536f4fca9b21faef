use slides_core::{
    parse_notes, resolve_crop, Category, CropSpec, DeckFormatter, NotesParser, PercentRange,
    Separator,
};

const LECTURE: &str = "\
#Intro Slide 1:
    Welcome
    Q: Who teaches the course?
    A: Prof. X

Slide 2:
    Q_S[0-100,0:50]: What does the top half show?
    A: A <histogram>

Slide 3:

Slide 4:
    S_Q[tr]: Identify the outlier
    S_A[br]: Bottom-right point

Slide 2:
    extra remark on slide two
";

#[test]
fn every_recorded_slide_has_full_text() {
    let notes = parse_notes(LECTURE).unwrap();

    assert_eq!(notes.slide_numbers().collect::<Vec<_>>(), vec![1, 2, 4]);
    for record in notes.slides.values() {
        assert!(!record.full.is_empty());
    }
}

#[test]
fn repeated_slide_collects_all_mentions() {
    let notes = NotesParser::new()
        .with_separator(Separator::Newline)
        .parse_str(LECTURE)
        .unwrap();

    let record = notes.get(2).unwrap();
    assert_eq!(
        record.full,
        "Q_S[0-100,0:50]: What does the top half show?\nA: A &lt;histogram&gt;\nextra remark on slide two"
    );
    assert_eq!(record.q_followed_by_slide, "What does the top half show?");
    assert_eq!(record.q_followed_by_slide_crop, resolve_crop("t"));
}

#[test]
fn doubled_document_repeats_fragments() {
    let once = NotesParser::new()
        .with_separator(Separator::Newline)
        .parse_str(LECTURE)
        .unwrap();
    let doubled_input = format!("{LECTURE}{LECTURE}");
    let twice = NotesParser::new()
        .with_separator(Separator::Newline)
        .parse_str(&doubled_input)
        .unwrap();

    assert_eq!(once.len(), twice.len());

    let slide_one = &once.get(1).unwrap().full;
    assert_eq!(
        twice.get(1).unwrap().full,
        format!("{slide_one}\n{slide_one}")
    );
    let slide_four = &once.get(4).unwrap().text(Category::SlideFollowedByA);
    assert_eq!(
        twice.get(4).unwrap().text(Category::SlideFollowedByA),
        format!("{slide_four}\n{slide_four}")
    );
}

#[test]
fn parse_error_reports_line() {
    let err = parse_notes("Slide 1:\n    fine\n\nSlide two:\n").unwrap_err();
    assert_eq!(err.line_number(), Some(4));
    assert!(err.to_string().contains("Slide two:"));
}

#[test]
fn crop_round_trip_over_valid_specs() {
    for (w_min, w_max, h_min, h_max) in [(0, 100, 0, 100), (10, 20, 30, 40), (99, 100, 0, 1)] {
        let spec = CropSpec {
            width: PercentRange::new(w_min, w_max),
            height: PercentRange::new(h_min, h_max),
        };
        assert_eq!(resolve_crop(&spec.to_string()), spec);
    }
}

#[test]
fn deck_for_lecture() {
    let notes = parse_notes(LECTURE).unwrap();
    let formatter = DeckFormatter::new("stats");
    let cards = formatter.cards(&notes);

    assert_eq!(cards.len(), 3);

    let names: Vec<_> = cards
        .iter()
        .flat_map(|c| c.media.iter().map(|m| m.file_name.as_str()))
        .collect();
    assert_eq!(names, vec!["stats-2-qs.png", "stats-4-sq.png", "stats-4-sa.png"]);

    let deck = formatter.format(&cards);
    assert_eq!(deck.lines().count(), 3);
    assert!(deck.starts_with("\"Who teaches the course?\"; \"Prof. X\"\n"));
}
