use crate::http::{FormValue, HttpError, HttpRequest, Payload};
use anstyle::{AnsiColor, Style};
use std::io::{self, Write};

fn pretty_print_json_colored(value: &serde_json::Value) -> String {
    use colored_json::{Color, ColoredFormatter, PrettyFormatter, Styler};
    let styler = Styler {
        key: Color::Yellow.bold(),
        ..Default::default()
    };
    let formatter = ColoredFormatter::with_styler(PrettyFormatter::new(), styler);
    formatter
        .to_colored_json_auto(value)
        .unwrap_or_else(|_| serde_json::to_string_pretty(value).unwrap_or_default())
}

fn get_status_style(status: u16) -> Style {
    match status {
        200..=299 => Style::new()
            .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)))
            .bold(),
        300..=399 => Style::new()
            .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)))
            .bold(),
        400..=599 => Style::new()
            .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Red)))
            .bold(),
        _ => Style::new()
            .fg_color(Some(anstyle::Color::Ansi(AnsiColor::White)))
            .bold(),
    }
}

fn format_status_line(status: u16) -> String {
    let status_style = get_status_style(status);
    format!(
        "{}Status: {}{}\n",
        status_style.render(),
        status,
        anstyle::Reset.render()
    )
}

fn format_header(name: &str, value: &str) -> String {
    let key_style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Blue)));
    let value_style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::White)));
    format!(
        "{}{}: {}{}{}\n",
        key_style.render(),
        name,
        value_style.render(),
        value,
        anstyle::Reset.render()
    )
}

fn format_plain(text: &str) -> String {
    let value_style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::White)));
    format!(
        "{}{}{}\n",
        value_style.render(),
        text,
        anstyle::Reset.render()
    )
}

/// Render a decoded body for the terminal
pub fn format_payload(payload: &Payload) -> String {
    match payload {
        Payload::Json(value) => pretty_print_json_colored(value),
        Payload::Text(text) => format_plain(text),
        Payload::Form(form) => {
            let mut output = String::new();
            for (name, value) in &form.entries {
                let rendered = match value {
                    FormValue::Text(text) => text.clone(),
                    FormValue::File {
                        filename,
                        content_type,
                        data,
                    } => format!(
                        "<file {filename}, {} bytes, {}>",
                        data.len(),
                        content_type.as_deref().unwrap_or("unknown type")
                    ),
                };
                output.push_str(&format_header(name, &rendered));
            }
            output
        }
        Payload::Blob(_) => format_plain(&payload.to_string()),
    }
}

/// Render the request that is about to be sent, for `--verbose`
pub fn format_request(req: &HttpRequest) -> String {
    let method_style = Style::new()
        .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)))
        .bold();
    let mut output = format!(
        "{}{} {}{}\n",
        method_style.render(),
        req.method,
        req.url,
        anstyle::Reset.render()
    );
    for (name, value) in &req.headers {
        output.push_str(&format_header(
            name.as_str(),
            value.to_str().unwrap_or("<invalid header value>"),
        ));
    }
    if let Some(ref body) = req.body {
        output.push_str(&format_plain(body));
    }
    output
}

pub fn print_request(req: &HttpRequest) {
    let _ = writeln!(io::stderr(), "{}", format_request(req));
}

pub fn print_outcome(result: &Result<Payload, HttpError>) {
    let _ = print_outcome_to(&mut io::stdout(), result);
}

fn print_outcome_to<W: Write>(
    writer: &mut W,
    result: &Result<Payload, HttpError>,
) -> io::Result<()> {
    match result {
        Ok(payload) => writeln!(writer, "{}", format_payload(payload)),
        Err(HttpError::Rejected { status, payload }) => {
            write!(writer, "{}", format_status_line(*status))?;
            writeln!(writer, "{}", format_payload(payload))
        }
        // Other failures are reported by the caller
        Err(_) => Ok(()),
    }
}
