use maud::{html, Markup};

/// Two-column table: a label and a formatted number per row.
pub fn value_table<L: AsRef<str>>(label_header: &str, value_header: &str, rows: &[(L, String)]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { (label_header) }
                    th { (value_header) }
                }
            }
            tbody {
                @for (label, value) in rows {
                    tr {
                        td { (label.as_ref()) }
                        td class="num" { (value) }
                    }
                }
            }
        }
    }
}

/// 12345678.9 -> "12,345,679"
pub fn thousands(v: f64) -> String {
    let rounded = v.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1_000.0), "1,000");
        assert_eq!(thousands(12_345_678.9), "12,345,679");
        assert_eq!(thousands(-1_500_000.0), "-1,500,000");
    }
}
