// Funciones para parsear franjas horarias ("08:30-09:50", "2:00 PM").
use chrono::NaiveTime;

fn to_time_opt(t: &str) -> Option<NaiveTime> {
    let mut tok = t.trim().to_uppercase().replace('.', ":");
    // quitar AM/PM si viene, ajustando a 24h
    let pm = tok.ends_with("PM");
    let am = tok.ends_with("AM");
    if pm || am {
        tok = tok[..tok.len() - 2].trim().to_string();
    }
    if tok.len() == 4 && tok.is_ascii() && !tok.contains(':') {
        tok = format!("{}:{}", &tok[..2], &tok[2..]);
    }
    let (hh, mm) = tok.split_once(':')?;
    let mut hh = hh.trim().parse::<u32>().ok()?;
    let mm = mm.trim().parse::<u32>().ok()?;
    if pm && hh < 12 {
        hh += 12;
    }
    if am && hh == 12 {
        hh = 0;
    }
    NaiveTime::from_hms_opt(hh, mm, 0)
}

/// Hora de inicio de una franja. `None` si no se puede interpretar
/// ("Unknown", texto libre); esas entradas se ordenan al final.
pub fn parse_start_time(slot: &str) -> Option<NaiveTime> {
    let first = slot.split('-').next()?;
    to_time_opt(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_times() {
        assert_eq!(parse_start_time("08:30-09:50"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_start_time("8.30 - 9.50"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_start_time("2:00 PM-3:20 PM"), NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(parse_start_time("0830"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_start_time("Unknown"), None);
        assert_eq!(parse_start_time(""), None);
    }
}
