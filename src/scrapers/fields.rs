//! Per-card field extraction.
//!
//! Every field is pulled out of one card element through its own ordered
//! cascade of strategies. A strategy that errors or finds nothing hands over
//! to the next one; no field's failure affects another field. Only a card
//! that cannot be read at all is reported back as an error.
//!
//! # Cascades
//!
//! | Field | Strategies, in order |
//! |-------|----------------------|
//! | title | `h3`, `h2`, `h1`, `.title`, `[data-testid*="title"]`, own text |
//! | league | `.label-4` / `[class*="league"]`, league slug in the link path |
//! | link | own `href`, first nested `a[href]` |
//! | image | high-res marker, `picture img`, `picture source` srcset, any `img` |

use crate::config::{LeagueKeyword, SiteConfig};
use crate::errors::{ConfigError, DriverError};
use crate::models::NewsRecord;
use crate::page::Node;
use crate::utils::{collapse_whitespace, resolve_link};
use tracing::trace;
use url::Url;

pub const TITLE_SELECTORS: &[&str] = &["h3", "h2", "h1", ".title", r#"[data-testid*="title"]"#];
pub const LEAGUE_SELECTOR: &str = r#".label-4, [class*="league"]"#;
pub const HIGH_RES_SELECTOR: &str = r#"img[data-testid="image-high-res"]"#;

const SCHEME_MARKER: &str = "http";

type ImageStrategy<N> = fn(&FieldExtractor, &N) -> Option<String>;

/// Field extraction rules for one site.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    origin: Url,
    leagues: Vec<LeagueKeyword>,
    image_formats: Vec<String>,
    strict_images: bool,
}

/// First non-empty collapsed text among the matches of each selector, trying
/// selectors in order.
fn first_text<N: Node>(scope: &N, selectors: &[&str]) -> Option<String> {
    for selector in selectors {
        match scope.find_all(selector) {
            Ok(nodes) => {
                let hit = nodes
                    .iter()
                    .find_map(|n| n.text().ok().and_then(|t| collapse_whitespace(&t)));
                if hit.is_some() {
                    return hit;
                }
            }
            Err(e) => trace!(%selector, error = %e, "Text selector failed"),
        }
    }
    None
}

/// Attribute values of every match of `selector`, skipping unreadable ones.
fn attribute_values<N: Node>(scope: &N, selector: &str, attribute: &str) -> Vec<String> {
    match scope.find_all(selector) {
        Ok(nodes) => nodes
            .iter()
            .filter_map(|n| n.attribute(attribute).ok().flatten())
            .collect(),
        Err(e) => {
            trace!(%selector, error = %e, "Attribute selector failed");
            Vec::new()
        }
    }
}

/// Candidate URLs of a `srcset`, in order, without their descriptors.
fn srcset_urls(srcset: &str) -> impl Iterator<Item = &str> {
    srcset.split(',').filter_map(|candidate| candidate.split_whitespace().next())
}

/// Display name of the first league (in table order) whose slug is a path
/// segment of `link`.
pub fn league_from_link(link: &str, leagues: &[LeagueKeyword]) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let segments: Vec<String> = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();
    leagues
        .iter()
        .find(|kw| segments.iter().any(|s| *s == kw.slug))
        .map(|kw| kw.name.clone())
}

impl FieldExtractor {
    pub fn new(config: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            origin: config.origin()?,
            leagues: config.leagues.clone(),
            image_formats: config
                .image_formats
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
            strict_images: config.strict_images,
        })
    }

    fn is_raster(&self, value: &str) -> bool {
        let lc = value.to_lowercase();
        self.image_formats.iter().any(|f| lc.contains(f.as_str()))
    }

    /// Headline text, falling back to the card's own text.
    ///
    /// `own_text` is the card's raw text as already read by the caller.
    pub fn title<N: Node>(&self, scope: &N, own_text: &str) -> Option<String> {
        first_text(scope, TITLE_SELECTORS).or_else(|| collapse_whitespace(own_text))
    }

    /// Absolute article link.
    pub fn link<N: Node>(&self, scope: &N) -> Option<String> {
        let own = match scope.attribute("href") {
            Ok(href) => href.filter(|h| !h.trim().is_empty()),
            Err(e) => {
                trace!(error = %e, "href read failed");
                None
            }
        };
        let href = own.or_else(|| attribute_values(scope, "a[href]", "href").into_iter().next())?;
        resolve_link(&self.origin, &href)
    }

    /// Competition label from the card, or inferred from an already resolved link.
    pub fn league<N: Node>(&self, scope: &N, link: Option<&str>) -> Option<String> {
        first_text(scope, &[LEAGUE_SELECTOR])
            .or_else(|| link.and_then(|l| league_from_link(l, &self.leagues)))
    }

    fn high_res_image<N: Node>(&self, scope: &N) -> Option<String> {
        attribute_values(scope, HIGH_RES_SELECTOR, "src")
            .into_iter()
            .find(|src| src.contains(SCHEME_MARKER))
    }

    fn picture_img<N: Node>(&self, scope: &N) -> Option<String> {
        attribute_values(scope, "picture img", "src")
            .into_iter()
            .find(|src| src.contains(SCHEME_MARKER))
    }

    fn picture_source<N: Node>(&self, scope: &N) -> Option<String> {
        attribute_values(scope, "picture source", "srcset")
            .iter()
            .flat_map(|srcset| srcset_urls(srcset))
            .find(|url| url.contains(SCHEME_MARKER) && self.is_raster(url))
            .map(str::to_string)
    }

    fn any_img<N: Node>(&self, scope: &N) -> Option<String> {
        attribute_values(scope, "img", "src")
            .into_iter()
            .find(|src| src.contains(SCHEME_MARKER) && self.is_raster(src))
    }

    /// Card image URL. Strict mode only trusts the high-resolution marker.
    pub fn image<N: Node>(&self, scope: &N) -> Option<String> {
        let cascade: [ImageStrategy<N>; 4] = [
            Self::high_res_image,
            Self::picture_img,
            Self::picture_source,
            Self::any_img,
        ];
        let depth = if self.strict_images { 1 } else { cascade.len() };
        cascade
            .iter()
            .take(depth)
            .enumerate()
            .find_map(|(i, strategy)| {
                let found = strategy(self, scope);
                if found.is_none() {
                    trace!(strategy = i, "Image strategy found nothing");
                }
                found
            })
    }

    /// Build the record for one card.
    ///
    /// # Errors
    ///
    /// Fails only when the card element itself cannot be read; individual
    /// fields degrade to `None` instead.
    pub fn extract_record<N: Node>(&self, element: &N) -> Result<NewsRecord, DriverError> {
        let own_text = element.text()?;
        let link = self.link(element);
        let title = self.title(element, &own_text);
        let league = self.league(element, link.as_deref());
        let image = self.image(element);
        Ok(NewsRecord {
            league,
            title,
            link,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Page, SnapshotPage};

    const URL: &str = "https://www.tntsports.co.uk/football/";

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(&SiteConfig::default()).unwrap()
    }

    fn loaded(body: &str) -> SnapshotPage {
        let html = format!("<html><body>{body}</body></html>");
        let mut page = SnapshotPage::new().with_document(URL, html);
        page.navigate(URL).unwrap();
        page
    }

    /// Run `f` against the first `a` of `body`.
    fn with_card<T>(body: &str, f: impl FnOnce(&scraper::ElementRef<'_>) -> T) -> T {
        let page = loaded(body);
        let cards = page.find_all("a").unwrap();
        f(&cards[0])
    }

    #[test]
    fn test_title_prefers_h3() {
        let title = with_card(
            r#"<a href="/x"><h2>Second</h2><h3>  Main
                 headline </h3></a>"#,
            |c| extractor().title(c, "ignored"),
        );
        assert_eq!(title.as_deref(), Some("Main headline"));
    }

    #[test]
    fn test_title_testid_substring() {
        let title = with_card(
            r#"<a href="/x"><span data-testid="card-title-text">From test id</span></a>"#,
            |c| extractor().title(c, "own"),
        );
        assert_eq!(title.as_deref(), Some("From test id"));
    }

    #[test]
    fn test_title_skips_empty_heading() {
        let title = with_card(
            r#"<a href="/x"><h3>   </h3><h2>Backup</h2></a>"#,
            |c| extractor().title(c, "own"),
        );
        assert_eq!(title.as_deref(), Some("Backup"));
    }

    #[test]
    fn test_title_falls_back_to_collapsed_own_text() {
        let title = with_card(
            "<a href=\"/x\"><span>Ten Hag</span>\n\n   <span>sacked</span></a>",
            |c| {
                let own = Node::text(c).unwrap();
                extractor().title(c, &own)
            },
        );
        assert_eq!(title.as_deref(), Some("Ten Hag sacked"));
    }

    #[test]
    fn test_title_empty_is_none_not_empty_string() {
        let title = with_card(r#"<a href="/x"> <img src="a.png"> </a>"#, |c| {
            let own = Node::text(c).unwrap();
            extractor().title(c, &own)
        });
        assert_eq!(title, None);
    }

    #[test]
    fn test_link_relative_and_absolute() {
        let rel = with_card(r#"<a href="/football/premier-league/story_sto1.shtml">x</a>"#, |c| {
            extractor().link(c)
        });
        assert_eq!(
            rel.as_deref(),
            Some("https://www.tntsports.co.uk/football/premier-league/story_sto1.shtml")
        );
        let abs = with_card(r#"<a href="https://www.eurosport.com/football/x.shtml">x</a>"#, |c| {
            extractor().link(c)
        });
        assert_eq!(abs.as_deref(), Some("https://www.eurosport.com/football/x.shtml"));
    }

    #[test]
    fn test_link_missing_or_empty() {
        assert_eq!(with_card(r#"<a>no href</a>"#, |c| extractor().link(c)), None);
        assert_eq!(with_card(r#"<a href="">empty</a>"#, |c| extractor().link(c)), None);
    }

    #[test]
    fn test_link_from_nested_anchor() {
        let page = loaded(r#"<article><div><a href="/football/nested">n</a></div></article>"#);
        let card = page.find_all("article").unwrap().remove(0);
        assert_eq!(
            extractor().link(&card).as_deref(),
            Some("https://www.tntsports.co.uk/football/nested")
        );
    }

    #[test]
    fn test_league_from_label() {
        let league = with_card(
            r#"<a href="/football/la-liga/x"><span class="label-4"> Premier League </span></a>"#,
            |c| extractor().league(c, Some("https://www.tntsports.co.uk/football/la-liga/x")),
        );
        assert_eq!(league.as_deref(), Some("Premier League"));
    }

    #[test]
    fn test_league_from_class_substring() {
        let league = with_card(
            r#"<a href="/x"><div class="card__league-name">Serie A</div></a>"#,
            |c| extractor().league(c, None),
        );
        assert_eq!(league.as_deref(), Some("Serie A"));
    }

    #[test]
    fn test_league_inferred_from_link() {
        let league = with_card(r#"<a href="/x"><h3>t</h3></a>"#, |c| {
            extractor().league(
                c,
                Some("https://www.tntsports.co.uk/football/champions-league/2025/story.shtml"),
            )
        });
        assert_eq!(league.as_deref(), Some("Champions League"));
    }

    #[test]
    fn test_league_priority_order() {
        let leagues = SiteConfig::default().leagues;
        let link = "https://www.tntsports.co.uk/football/championship/scottish-premiership/x";
        assert_eq!(
            league_from_link(link, &leagues).as_deref(),
            Some("Scottish Premiership")
        );
        assert_eq!(league_from_link("https://x.y/football/news", &leagues), None);
        assert_eq!(league_from_link("not a url", &leagues), None);
    }

    #[test]
    fn test_league_absent() {
        let league = with_card(r#"<a href="/x"><h3>t</h3></a>"#, |c| {
            extractor().league(c, Some("https://www.tntsports.co.uk/football/news/x"))
        });
        assert_eq!(league, None);
    }

    #[test]
    fn test_image_high_res_first() {
        let pic = with_card(
            r#"<a href="/x">
                <picture><img src="https://img.tnt/low.jpeg"></picture>
                <img data-testid="image-high-res" src="https://img.tnt/high.jpeg">
            </a>"#,
            |c| extractor().image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/high.jpeg"));
    }

    #[test]
    fn test_image_picture_img_requires_scheme() {
        let pic = with_card(
            r#"<a href="/x"><picture>
                <img src="data:image/gif;base64,R0lGOD">
                <img src="https://img.tnt/lazy.webp">
            </picture></a>"#,
            |c| extractor().image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/lazy.webp"));
    }

    #[test]
    fn test_image_only_srcset_strategy_succeeds() {
        // strategies 1, 2 and 4 all reject: no marker, picture img without scheme,
        // and no img outside picture with a scheme and format
        let pic = with_card(
            r#"<a href="/x"><picture>
                <source srcset="https://img.tnt/card.avif 1x" type="image/avif">
                <source srcset="https://img.tnt/card.jpeg 1x, https://img.tnt/card@2.jpeg 2x">
                <img src="/placeholder.svg">
            </picture></a>"#,
            |c| extractor().image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/card.jpeg"));
    }

    #[test]
    fn test_image_srcset_trailing_comma() {
        let pic = with_card(
            r#"<a href="/x"><picture><source srcset="https://img.tnt/a.png, https://img.tnt/b.png 2x"></picture></a>"#,
            |c| extractor().image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/a.png"));
    }

    #[test]
    fn test_image_srcset_format_checked_per_candidate() {
        let pic = with_card(
            r#"<a href="/x"><picture>
                <source srcset="https://img.tnt/a.avif 1x, https://img.tnt/a.jpeg 2x">
            </picture></a>"#,
            |c| extractor().image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/a.jpeg"));
    }

    #[test]
    fn test_image_any_img_needs_format() {
        let pic = with_card(
            r#"<a href="/x">
                <img src="https://tracker.example/pixel">
                <img src="https://img.tnt/thumb.JPG?w=300">
            </a>"#,
            |c| extractor().image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/thumb.JPG?w=300"));
    }

    #[test]
    fn test_image_absent() {
        let pic = with_card(r#"<a href="/x"><img src="/relative.jpeg"></a>"#, |c| {
            extractor().image(c)
        });
        assert_eq!(pic, None);
    }

    #[test]
    fn test_strict_images_only_high_res() {
        let config = SiteConfig {
            strict_images: true,
            ..SiteConfig::default()
        };
        let strict = FieldExtractor::new(&config).unwrap();
        let pic = with_card(
            r#"<a href="/x"><img src="https://img.tnt/plain.jpeg"></a>"#,
            |c| strict.image(c),
        );
        assert_eq!(pic, None);
        let pic = with_card(
            r#"<a href="/x"><img data-testid="image-high-res" src="https://img.tnt/hd.jpeg"></a>"#,
            |c| strict.image(c),
        );
        assert_eq!(pic.as_deref(), Some("https://img.tnt/hd.jpeg"));
    }

    #[test]
    fn test_extract_record_full_card() {
        let record = with_card(
            r#"<a data-testid="link-undefined" href="/football/premier-league/2025/arsenal_sto1.shtml">
                <picture><source srcset="https://img.tnt/a.jpeg 1x"></picture>
                <img data-testid="image-high-res" src="https://img.tnt/a-hd.jpeg">
                <div class="label-4">Premier League</div>
                <h3>Arsenal go top</h3>
            </a>"#,
            |c| extractor().extract_record(c).unwrap(),
        );
        assert_eq!(
            record,
            NewsRecord {
                league: Some("Premier League".into()),
                title: Some("Arsenal go top".into()),
                link: Some(
                    "https://www.tntsports.co.uk/football/premier-league/2025/arsenal_sto1.shtml"
                        .into()
                ),
                image: Some("https://img.tnt/a-hd.jpeg".into()),
            }
        );
    }
}
