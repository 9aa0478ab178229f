use bytes::Bytes;
use chrono::Utc;
use reqwest::StatusCode;
use std::fs;
use url::Url;

use crate::export::Flatten;
use crate::extractor::{TableExtractor, extract};
use crate::fetcher::types::{Charset, FetchedPage};

const BASE: &str = "https://pokemythology.net";

fn extractor() -> TableExtractor {
    TableExtractor::new(Url::parse(BASE).unwrap())
}

fn create_test_page(html: String, url: &str) -> FetchedPage {
    FetchedPage {
        url_final: Url::parse(url).unwrap(),
        status: StatusCode::OK,
        body_raw: Bytes::from(html.clone()),
        body_utf8: html,
        charset: Charset::Utf8,
        fetched_at: Utc::now(),
    }
}

#[test]
fn test_extract_list_page() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/lista01.htm")
        .expect("Failed to read test fixture");

    let page = create_test_page(html, "https://pokemythology.net/conteudo/pokemon/lista01.htm");
    let records = extract(&page, &extractor());

    // Layout table has no id, missingno has neither number nor name
    assert_eq!(records.len(), 2);

    let bulbasaur = &records[0];
    assert_eq!(bulbasaur.identifier(), "001");
    assert_eq!(bulbasaur.name(), "Bulbasaur");
    assert_eq!(bulbasaur.categories(), ["Grass", "Poison"]);
    assert_eq!(
        bulbasaur.primary_image(),
        Some("https://pokemythology.net/conteudo/pokemon/imagens/001.gif")
    );
    assert_eq!(bulbasaur.attribute("Altura"), Some("0.7 m"));
    assert_eq!(bulbasaur.attribute("Peso"), Some("6.9 kg"));
    assert_eq!(
        bulbasaur.attribute("Coloração Shiny"),
        Some("https://pokemythology.net/conteudo/pokemon/shiny/001.gif")
    );

    let charizard = &records[1];
    assert_eq!(charizard.identifier(), "006");
    assert_eq!(charizard.name(), "Charizard");
    assert_eq!(charizard.categories(), ["Fire", "Flying"]);
    assert_eq!(
        charizard.primary_image(),
        Some("https://pokemythology.net/imagens/006.gif")
    );
    assert_eq!(
        charizard.attribute("Coloração Shiny"),
        Some("https://pokemythology.net/shiny/006.gif")
    );
    assert_eq!(charizard.attribute("Habilidade"), Some("Blaze"));
}

#[test]
fn test_single_entry_table() {
    let html = r#"<html><body><table id="pikachu">
        <tr><td><img src="/conteudo/pokemon/imagens/025.gif"></td></tr>
        <tr><td>Nº:</td><td>025</td></tr>
        <tr><td>Nome:</td><td>Pikachu</td></tr>
        <tr><td>Tipo:</td><td>Electric</td></tr>
        <tr><td>Altura:</td><td>0.4m</td></tr>
    </table></body></html>"#
        .to_string();

    let page = create_test_page(html, "https://pokemythology.net/conteudo/pokemon/lista02.htm");
    let records = extract(&page, &extractor());

    assert_eq!(records.len(), 1);
    let pikachu = &records[0];
    assert_eq!(pikachu.identifier(), "025");
    assert_eq!(pikachu.name(), "Pikachu");
    assert_eq!(pikachu.categories(), ["Electric"]);
    assert_eq!(
        pikachu.primary_image(),
        Some("https://pokemythology.net/conteudo/pokemon/imagens/025.gif")
    );
    assert_eq!(pikachu.attribute("Altura"), Some("0.4m"));
    assert_eq!(pikachu.attributes().len(), 1);

    let row = pikachu.flatten();
    assert_eq!(row.get("Nº").map(String::as_str), Some("025"));
}

#[test]
fn test_page_without_primary_tables() {
    let html = "<html><body><table><tr><td>Nº:</td><td>1</td><td>Nome:</td><td>X</td></tr></table></body></html>"
        .to_string();

    let page = create_test_page(html, "https://pokemythology.net/index.htm");
    assert!(extract(&page, &extractor()).is_empty());
}

#[test]
fn test_malformed_html() {
    let html = "<table id=broken><tr><td>Nº:<td>151<tr><td>Nome:<td>Mew<td>Tipo:<td>Psychic".to_string();

    let page = create_test_page(html, "https://pokemythology.net/conteudo/pokemon/lista08.htm");
    let records = extract(&page, &extractor());

    // Unclosed cells and rows are recovered by the parser
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identifier(), "151");
    assert_eq!(records[0].name(), "Mew");
    assert_eq!(records[0].categories(), ["Psychic"]);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            path in "[a-z/]*",
        ) {
            let page = create_test_page(html, &format!("{BASE}/{path}"));
            let _ = extract(&page, &extractor());
        }

        #[test]
        fn test_identifier_text_is_kept_verbatim(
            number in "[0-9]{3}",
        ) {
            let html = format!(
                "<table id=t><tr><td>Nº:</td><td>{number}</td><td>Nome:</td><td>X</td></tr></table>"
            );
            let page = create_test_page(html, BASE);
            let records = extract(&page, &extractor());
            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(records[0].identifier(), number.as_str());
        }
    }
}
