//! End-to-end integration tests

use crate::config::CaptionConfig;
use crate::integration::fixtures::{config_presets, TestStory};
use crate::integration::validation::{validate_sami, ValidationResult};
use crate::segment::{segment_story, TimedLine};
use crate::subtitle::{encode_sami, parse_sami, plan_events};

/// Content start < content end < clear < next content start, for every line
pub fn test_monotonic_timing(story: &TestStory, config: &CaptionConfig) -> ValidationResult {
    let lines = match segment_story(story.text, config) {
        Ok(lines) => lines,
        Err(e) => return ValidationResult::fail(format!("Segmenting failed: {}", e)),
    };
    let events = match plan_events(&lines, config) {
        Ok(events) => events,
        Err(e) => return ValidationResult::fail(format!("Planning failed: {}", e)),
    };

    if events.len() != lines.len() * 2 {
        return ValidationResult::fail(format!(
            "Expected {} events for {} lines, got {}",
            lines.len() * 2,
            lines.len(),
            events.len()
        ));
    }

    for (i, (pair, line)) in events.chunks(2).zip(&lines).enumerate() {
        let (content, clear) = (&pair[0], &pair[1]);
        if content.is_clear() || !clear.is_clear() {
            return ValidationResult::fail(format!("Line {} events are not content then clear", i));
        }

        let start = content.start_ms;
        let end = start + line.duration_ms;
        if !(start < end && end < clear.start_ms) {
            return ValidationResult::fail(format!(
                "Line {}: expected start {} < end {} < clear {}",
                i, start, end, clear.start_ms
            ));
        }

        if let Some(next) = events.get(2 * i + 2) {
            if clear.start_ms >= next.start_ms {
                return ValidationResult::fail(format!(
                    "Line {}: clear {} does not precede next start {}",
                    i, clear.start_ms, next.start_ms
                ));
            }
        }
    }

    ValidationResult::success()
}

/// Visible line counts climb 1..=limit and then start over at 1
pub fn test_buffer_bound(story: &TestStory, config: &CaptionConfig) -> ValidationResult {
    let lines = match segment_story(story.text, config) {
        Ok(lines) => lines,
        Err(e) => return ValidationResult::fail(format!("Segmenting failed: {}", e)),
    };
    let events = match plan_events(&lines, config) {
        Ok(events) => events,
        Err(e) => return ValidationResult::fail(format!("Planning failed: {}", e)),
    };

    let limit = config.cumulative_lines_limit;
    for (i, content) in events.iter().filter(|e| !e.is_clear()).enumerate() {
        let visible = content.display_text().split("<br>").count();
        if visible > limit {
            return ValidationResult::fail(format!(
                "Event {} shows {} lines, limit is {}",
                i, visible, limit
            ));
        }
        if visible != i % limit + 1 {
            return ValidationResult::fail(format!(
                "Event {} shows {} lines, expected {}",
                i,
                visible,
                i % limit + 1
            ));
        }
    }

    ValidationResult::success()
}

/// Encoded then decoded: 2 segments per line, contiguous, and each content
/// segment reproduces the cumulative buffer
pub fn test_round_trip(story: &TestStory, config: &CaptionConfig) -> ValidationResult {
    let lines = match segment_story(story.text, config) {
        Ok(lines) => lines,
        Err(e) => return ValidationResult::fail(format!("Segmenting failed: {}", e)),
    };
    let document = match encode_sami(&lines, config) {
        Ok(doc) => doc,
        Err(e) => return ValidationResult::fail(format!("Encoding failed: {}", e)),
    };

    let structure = validate_sami(&document);
    if !structure.is_valid {
        return structure;
    }

    let segments = match parse_sami(&document) {
        Ok(segments) => segments,
        Err(e) => return ValidationResult::fail(format!("Decoding failed: {}", e)),
    };

    if segments.len() != lines.len() * 2 {
        return ValidationResult::fail(format!(
            "Expected {} segments, got {}",
            lines.len() * 2,
            segments.len()
        ));
    }

    for pair in segments.windows(2) {
        if pair[0].end_time_ms != Some(pair[1].start_time_ms) {
            return ValidationResult::fail(format!(
                "Segment at {} ends at {:?}, next starts at {}",
                pair[0].start_time_ms, pair[0].end_time_ms, pair[1].start_time_ms
            ));
        }
    }
    if let Some(last) = segments.last() {
        if last.end_time_ms.is_some() || last.duration_ms.is_some() {
            return ValidationResult::fail("Last segment must have no end");
        }
    }

    let limit = config.cumulative_lines_limit;
    for (i, segment) in segments.iter().step_by(2).enumerate() {
        let first = i - i % limit;
        let expected: Vec<&str> = lines[first..=i].iter().map(|l| l.text.as_str()).collect();
        let actual: Vec<&str> = segment.text.split('\n').collect();
        if actual != expected {
            return ValidationResult::fail(format!(
                "Segment {} text {:?}, expected buffer {:?}",
                i, actual, expected
            ));
        }
    }
    for (i, clear) in segments.iter().skip(1).step_by(2).enumerate() {
        if !clear.is_blank() {
            return ValidationResult::fail(format!("Clear segment {} has text {:?}", i, clear.text));
        }
    }

    ValidationResult::success()
}

/// Run every property over every fixture and preset
pub fn test_all_properties() -> Vec<(String, ValidationResult)> {
    let mut results = Vec::new();
    for story in TestStory::all() {
        for (preset, config) in config_presets() {
            let name = |check: &str| format!("{} / {} / {}", story.name, preset, check);
            results.push((name("timing"), test_monotonic_timing(&story, &config)));
            results.push((name("buffer"), test_buffer_bound(&story, &config)));
            results.push((name("round trip"), test_round_trip(&story, &config)));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_properties_e2e() {
        for (name, result) in test_all_properties() {
            assert!(result.is_valid, "{} failed: {:?}", name, result.errors);
        }
    }

    #[test]
    fn test_fixtures_produce_lines() {
        let config = CaptionConfig::default();
        for story in TestStory::all() {
            assert!(
                !segment_story(story.text, &config).unwrap().is_empty(),
                "{} ({}) produced no lines",
                story.name,
                story.description
            );
        }
    }

    #[test]
    fn test_duration_clamp_e2e() {
        for story in TestStory::all() {
            for (preset, config) in config_presets() {
                for line in segment_story(story.text, &config).unwrap() {
                    assert!(
                        (config.min_duration_ms..=config.max_duration_ms).contains(&line.duration_ms),
                        "{} / {}: {:?} out of range",
                        story.name,
                        preset,
                        line
                    );
                }
            }
        }
    }

    #[test]
    fn test_hello_world_scenario() {
        let config = CaptionConfig::default();
        let lines = segment_story(TestStory::hello_world().text, &config).unwrap();
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.text.chars().count() <= 30));

        let document = encode_sami(&lines, &config).unwrap();
        let segments = parse_sami(&document).unwrap();

        let non_blank: Vec<_> = segments.iter().filter(|s| !s.is_blank()).collect();
        assert_eq!(non_blank.len(), lines.len());
        assert!(non_blank.iter().all(|s| s.end_time_ms.is_some()));
        for pair in segments.windows(2) {
            assert!(pair[0].start_time_ms < pair[1].start_time_ms);
        }

        let (last, rest) = segments.split_last().unwrap();
        assert!(last.end_time_ms.is_none());
        assert!(rest.iter().all(|s| s.end_time_ms.is_some()));
    }

    #[test]
    fn test_empty_story_scenario() {
        let config = CaptionConfig::default();
        let lines = segment_story("", &config).unwrap();
        assert!(lines.is_empty());

        let document = encode_sami(&lines, &config).unwrap();
        assert!(!document.contains("<SYNC"));
        assert!(validate_sami(&document).is_valid);
        assert!(parse_sami(&document).unwrap().is_empty());
    }

    #[test]
    fn test_escaping_round_trip() {
        let config = CaptionConfig::default();
        let raw = "a < b & c > d; &amp; <br> &nbsp;&lt;";
        let document = encode_sami(&[TimedLine::new(raw, 2000)], &config).unwrap();
        assert!(validate_sami(&document).is_valid);

        let segments = parse_sami(&document).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, raw);
    }

    #[test]
    fn test_buffer_reset_after_limit() {
        let config = CaptionConfig {
            cumulative_lines_limit: 3,
            ..Default::default()
        };
        let lines: Vec<TimedLine> = (1..=7).map(|i| TimedLine::new(format!("L{}", i), 1500)).collect();
        let segments = parse_sami(&encode_sami(&lines, &config).unwrap()).unwrap();
        let texts: Vec<&str> = segments.iter().step_by(2).map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["L1", "L1\nL2", "L1\nL2\nL3", "L4", "L4\nL5", "L4\nL5\nL6", "L7"]
        );
    }

    #[test]
    fn test_concurrent_encoding_matches_sequential() {
        let config = CaptionConfig::default();
        let stories = TestStory::all();
        let sequential: Vec<String> = stories
            .iter()
            .map(|s| encode_sami(&segment_story(s.text, &config).unwrap(), &config).unwrap())
            .collect();

        let concurrent: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = stories
                .iter()
                .map(|s| {
                    let config = &config;
                    scope.spawn(move || {
                        encode_sami(&segment_story(s.text, config).unwrap(), config).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, concurrent);
    }
}
