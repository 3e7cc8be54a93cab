//! 문자열 유사도 점수.
//!
//! 점수는 0~100 정수이며, 다음 비율들을 가중 결합합니다:
//! - 기본 비율: `2 * LCS / (len_a + len_b)`
//! - 부분 비율: 짧은 문자열과 같은 길이의 가장 잘 맞는 구간
//! - 토큰 정렬 비율: 단어를 정렬한 뒤 비교
//! - 토큰 집합 비율: 공통 단어와 나머지 단어를 분리해 비교
//!
//! 길이 차이가 1.5배 이상이면 부분 비율 계열을 사용하고,
//! 8배를 넘으면 부분 비율의 가중치를 더 낮춥니다.

use std::collections::BTreeSet;

const PARTIAL_RATIO_THRESHOLD: f64 = 1.5;
const LONG_PARTIAL_THRESHOLD: f64 = 8.0;
const UNBASE_SCALE: f64 = 0.95;

/// 비교용 정규화: 소문자, 영숫자 외 문자는 공백, 앞뒤 공백 제거.
pub fn process(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// 최장 공통 부분 수열 길이.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

fn to_score(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// 기본 비율 (0~100).
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    to_score(ratio_chars(&a, &b))
}

/// 부분 비율 (0~100).
///
/// 긴 문자열 안에서 짧은 문자열과 길이가 같은 모든 구간을 비교해 최댓값을 취합니다.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.is_empty() {
        return 0;
    }

    let best = longer
        .windows(shorter.len())
        .map(|window| ratio_chars(&shorter, window))
        .fold(0.0_f64, f64::max);
    to_score(best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort(a: &str, b: &str, partial: bool) -> u8 {
    let (a, b) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

fn token_set(a: &str, b: &str, partial: bool) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&&str>| set.into_iter().copied().collect::<Vec<_>>().join(" ");
    let intersection = join(tokens_a.intersection(&tokens_b).collect());
    let diff_ab = join(tokens_a.difference(&tokens_b).collect());
    let diff_ba = join(tokens_b.difference(&tokens_a).collect());

    let combined_ab = format!("{} {}", intersection, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", intersection, diff_ba).trim().to_string();

    let compare = |x: &str, y: &str| {
        if partial {
            partial_ratio(x, y)
        } else {
            ratio(x, y)
        }
    };

    [
        compare(&intersection, &combined_ab),
        compare(&intersection, &combined_ba),
        compare(&combined_ab, &combined_ba),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// 가중 유사도 점수 (0~100).
///
/// 두 문자열 모두 [`process`]로 정규화한 뒤 비교합니다.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (process(a), process(b));
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a == 0 || len_b == 0 {
        return 0;
    }

    let base = ratio(&a, &b) as f64;
    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;

    let best = if len_ratio < PARTIAL_RATIO_THRESHOLD {
        let sort = token_sort(&a, &b, false) as f64 * UNBASE_SCALE;
        let set = token_set(&a, &b, false) as f64 * UNBASE_SCALE;
        base.max(sort).max(set)
    } else {
        let partial_scale = if len_ratio <= LONG_PARTIAL_THRESHOLD {
            0.9
        } else {
            0.6
        };
        let partial = partial_ratio(&a, &b) as f64 * partial_scale;
        let sort = token_sort(&a, &b, true) as f64 * UNBASE_SCALE * partial_scale;
        let set = token_set(&a, &b, true) as f64 * UNBASE_SCALE * partial_scale;
        base.max(partial).max(sort).max(set)
    };

    best.round().clamp(0.0, 100.0) as u8
}
