use anyhow::Result;
use atv_client::AppConfig;
use atv_client::api::decode_payload;
use atv_client::models::Paginated;
use atv_client::ui::{PageControl, build_pagination};
use clap::Args;
use serde_json::Value;

#[derive(Args)]
pub struct GetArgs {
    /// API path, e.g. `/atvs`
    path: String,
    /// Query parameter as `key=value`; repeatable
    #[arg(short, long = "query", value_parser = parse_pair)]
    query: Vec<(String, String)>,
    /// Page number for paginated listings
    #[arg(long)]
    page: Option<u32>,
    /// Print the whole response envelope
    #[arg(long)]
    raw: bool,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

impl GetArgs {
    pub async fn run(&self, config: AppConfig) -> Result<()> {
        let landing = config.landing_page.clone();
        let ctx = super::open_context(config, &landing, false)?;

        let mut query = self.query.clone();
        if let Some(page) = self.page {
            query.push(("page".to_owned(), page.to_string()));
        }
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        let response = ctx
            .api()
            .get(&path, &query)
            .await
            .map_err(|e| super::api_failure(&e))?;
        if self.raw {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        let payload: Value = decode_payload(response).map_err(|e| super::api_failure(&e))?;
        match serde_json::from_value::<Paginated<Value>>(payload.clone()) {
            Ok(page) => {
                println!("{}", serde_json::to_string_pretty(&page.data)?);
                let controls = render_controls(&build_pagination(&page.pagination));
                let suffix = if controls.is_empty() {
                    String::new()
                } else {
                    format!("  {controls}")
                };
                eprintln!(
                    "page {} of {}{suffix}",
                    page.pagination.current_page, page.pagination.last_page,
                );
            }
            Err(_) => println!("{}", serde_json::to_string_pretty(&payload)?),
        }
        Ok(())
    }
}

/// One-line text form of the pager, e.g. `< 1 ... 3 4 [5] 6 7 ... 10 >`.
fn render_controls(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|c| match c {
            PageControl::Prev(_) => "<".to_owned(),
            PageControl::Page { number, active: true } => format!("[{number}]"),
            PageControl::Page { number, active: false } => number.to_string(),
            PageControl::Ellipsis => "...".to_owned(),
            PageControl::Next(_) => ">".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use atv_client::Pagination;

    #[test]
    fn pairs() {
        assert_eq!(
            parse_pair("search=quad bike").unwrap(),
            ("search".to_owned(), "quad bike".to_owned())
        );
        assert_eq!(parse_pair("a=b=c").unwrap().1, "b=c");
        assert!(parse_pair("nope").is_err());
    }

    #[test]
    fn pager_text() {
        let controls = build_pagination(&Pagination::new(5, 10));
        assert_eq!(render_controls(&controls), "< 1 ... 3 4 [5] 6 7 ... 10 >");
        assert!(render_controls(&build_pagination(&Pagination::new(1, 1))).is_empty());
    }
}
