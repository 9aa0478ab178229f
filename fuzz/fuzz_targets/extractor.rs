#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use dexharvest::extractor::TableExtractor;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let extractor = TableExtractor::new(Url::parse("https://pokemythology.net").unwrap());

    // Arbitrary markup must never panic the table scan
    let _ = extractor.extract_all(&html, "https://pokemythology.net/conteudo/pokemon/lista01.htm");
});
