//! `{{TOKEN}}` 치환 렌더러.
//!
//! 값이 비어 있는 슬롯만 있던 줄은 제거하고, 그 자리에 생긴 연속 빈 줄과
//! 내용이 사라진 섹션 헤더를 함께 정리한다. 슬롯에 없는 토큰은 그대로 남는다.

use std::collections::HashMap;

/// 슬롯 이름 -> 치환 값.
pub type Slots = HashMap<String, String>;

/// 템플릿의 토큰을 치환하고 빈 슬롯 흔적을 정리한다.
pub fn render(template: &str, slots: &Slots) -> String {
    let lines: Vec<&str> = template.split('\n').collect();

    let mut dropped: Vec<bool> = lines
        .iter()
        .map(|line| is_empty_slot_line(line, slots))
        .collect();

    // 빈 슬롯 줄만 남은 섹션의 헤더도 제거한다.
    let token_lines: Vec<usize> = (0..lines.len()).filter(|&i| dropped[i]).collect();
    for i in token_lines {
        if let Some(header) = dangling_header(&lines, &dropped, i) {
            dropped[header] = true;
        }
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut gap = false;
    for (i, line) in lines.iter().enumerate() {
        if dropped[i] {
            gap = true;
            continue;
        }
        let blank = line.trim().is_empty();
        if blank && gap && kept.last().is_none_or(|l| l.trim().is_empty()) {
            continue;
        }
        if !blank {
            gap = false;
        }
        kept.push(line);
    }

    substitute(&kept.join("\n"), slots).trim_end().to_string()
}

/// 한 번의 스캔으로 치환한다. 치환된 값은 다시 검사하지 않는다.
fn substitute(text: &str, slots: &Slots) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        if let Some(end) = after.find("}}")
            && let Some(value) = slots.get(&after[..end])
        {
            out.push_str(value);
            rest = &after[end + 2..];
            continue;
        }
        out.push_str("{{");
        rest = after;
    }
    out.push_str(rest);
    out
}

/// 줄 전체가 값이 빈 슬롯 토큰으로만 이루어졌는지 판단한다.
fn is_empty_slot_line(line: &str, slots: &Slots) -> bool {
    let mut rest = line.trim();
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let Some(after) = rest.strip_prefix("{{") else {
            return false;
        };
        let Some(end) = after.find("}}") else {
            return false;
        };
        match slots.get(&after[..end]) {
            Some(value) if value.is_empty() => rest = after[end + 2..].trim_start(),
            _ => return false,
        }
    }
    true
}

/// `idx` 줄 바로 위 헤더가 다른 내용 없이 끝나는 경우 그 헤더 위치를 반환한다.
fn dangling_header(lines: &[&str], dropped: &[bool], idx: usize) -> Option<usize> {
    let prev = (0..idx)
        .rev()
        .find(|&i| !dropped[i] && !lines[i].trim().is_empty())?;
    let level = header_level(lines[prev])?;

    let next = (idx + 1..lines.len()).find(|&i| !dropped[i] && !lines[i].trim().is_empty());
    match next {
        None => Some(prev),
        Some(i) => match header_level(lines[i]) {
            Some(next_level) if next_level <= level => Some(prev),
            _ => None,
        },
    }
}

fn header_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    match trimmed[level..].chars().next() {
        None | Some(' ') | Some('\t') => Some(level),
        _ => None,
    }
}
