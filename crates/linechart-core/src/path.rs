// File: crates/linechart-core/src/path.rs
// Summary: Polyline path data (`M x,y L x,y ...`) generation and parsing.

/// Path data through `points`. Points with a non-finite coordinate end the
/// current run; the next finite point starts a new one with `M`.
/// Returns `None` when no point is finite.
pub fn line_path(points: &[(f64, f64)]) -> Option<String> {
    let mut d = String::with_capacity(points.len() * 16);
    let mut in_run = false;
    for &(x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            in_run = false;
            continue;
        }
        d.push(if in_run { 'L' } else { 'M' });
        d.push_str(&coord(x));
        d.push(',');
        d.push_str(&coord(y));
        in_run = true;
    }
    (!d.is_empty()).then_some(d)
}

/// Up to three decimals, trailing zeros trimmed.
fn coord(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn flush(num: &mut String, cmd: char, pending: &mut Option<f64>, runs: &mut Vec<Vec<(f64, f64)>>) {
    if num.is_empty() {
        return;
    }
    let v = num.parse::<f64>().ok();
    num.clear();
    let Some(v) = v else { return };
    match pending.take() {
        None => *pending = Some(v),
        Some(x) => match cmd {
            'M' => runs.push(vec![(x, v)]),
            'L' => match runs.last_mut() {
                Some(run) => run.push((x, v)),
                None => runs.push(vec![(x, v)]),
            },
            _ => {}
        },
    }
}

/// Split path data made of absolute `M`/`L` commands back into runs of points.
/// Unknown commands are skipped along with their arguments.
pub fn parse_path(d: &str) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut cmd = ' ';
    let mut pending: Option<f64> = None;
    let mut num = String::new();

    for ch in d.chars() {
        match ch {
            '0'..='9' | '.' | 'e' | 'E' => num.push(ch),
            '-' | '+' if num.is_empty() || num.ends_with(['e', 'E']) => num.push(ch),
            '-' | '+' => {
                flush(&mut num, cmd, &mut pending, &mut runs);
                num.push(ch);
            }
            c if c.is_ascii_alphabetic() => {
                flush(&mut num, cmd, &mut pending, &mut runs);
                pending = None;
                cmd = c;
            }
            _ => flush(&mut num, cmd, &mut pending, &mut runs),
        }
    }
    flush(&mut num, cmd, &mut pending, &mut runs);
    runs
}

