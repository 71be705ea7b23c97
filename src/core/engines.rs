//! Engine set normalization

use crate::core::models::Engine;

/// Normalize a free-form list of engine tags.
///
/// Tags are trimmed and lower-cased; blanks, unknown tags and repeats are
/// dropped, the first occurrence fixing the preference order. An empty
/// outcome yields every known engine in default order.
pub fn normalize_engines<S: AsRef<str>>(engines: &[S]) -> Vec<Engine> {
    let mut out: Vec<Engine> = Vec::with_capacity(Engine::ALL.len());

    for tag in engines {
        let Ok(engine) = tag.as_ref().parse::<Engine>() else {
            continue;
        };
        if !out.contains(&engine) {
            out.push(engine);
        }
    }

    if out.is_empty() {
        return Engine::ALL.to_vec();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dedupes_and_filters() {
        let engines = normalize_engines(&["Tencent", " aliyun", "bogus", "tencent"]);
        assert_eq!(engines, vec![Engine::Tencent, Engine::Aliyun]);
    }

    #[test]
    fn test_normalize_preserves_first_occurrence_order() {
        let engines = normalize_engines(&["ALIYUN", "", "tencent", "aliyun"]);
        assert_eq!(engines, vec![Engine::Aliyun, Engine::Tencent]);
    }

    #[test]
    fn test_normalize_defaults_to_all_engines() {
        let empty: [&str; 0] = [];
        assert_eq!(normalize_engines(&empty), Engine::ALL.to_vec());
        assert_eq!(normalize_engines(&["  ", "deepl"]), Engine::ALL.to_vec());
    }

    #[test]
    fn test_normalize_single_engine() {
        let engines = normalize_engines(&[String::from("aliyun")]);
        assert_eq!(engines, vec![Engine::Aliyun]);
    }
}
