/// Engine language codes for a source-language setting.
///
/// "auto" unions every supported code so mixed pages still recognize;
/// unknown settings fall back to English.
pub fn engine_languages(source_language: &str) -> Vec<&'static str> {
    match source_language {
        "ja" => vec!["jpn"],
        "ko" => vec!["kor"],
        "zh" => vec!["chi_sim"],
        "en" => vec!["eng"],
        "auto" => vec!["eng", "jpn", "kor", "chi_sim"],
        _ => vec!["eng"],
    }
}
