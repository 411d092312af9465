use watchlist_catalog::*;

#[test]
fn manifest_declares_catalog_per_type() {
    let manifest = Manifest::watchlist();
    assert_eq!(manifest.id, "org.yofardev.letterboxd");
    assert_eq!(manifest.name, "Watchlist");
    assert_eq!(manifest.description, "Import Letterboxd watchlist from CSV file");
    assert_eq!(manifest.resources, vec!["catalog", "stream"]);
    assert_eq!(manifest.types, vec![MediaType::Movie, MediaType::Series]);
    assert_eq!(manifest.id_prefixes, vec!["tt"]);
    assert_eq!(
        manifest.catalog_type("letterboxd-watchlist-movies"),
        Some(MediaType::Movie)
    );
    assert_eq!(
        manifest.catalog_type("letterboxd-watchlist-series"),
        Some(MediaType::Series)
    );
    assert_eq!(manifest.catalog_type("something-else"), None);
}

#[test]
fn manifest_json_shape() {
    let json = serde_json::to_value(Manifest::watchlist()).unwrap();
    assert_eq!(json["idPrefixes"][0], "tt");
    assert_eq!(json["catalogs"][0]["type"], "movie");
    assert_eq!(json["catalogs"][0]["id"], "letterboxd-watchlist-movies");
    assert_eq!(json["types"][1], "series");
}

#[test]
fn stream_json_uses_external_url() {
    let response = StreamResponse {
        streams: vec![Stream {
            name: "Letterboxd".to_string(),
            title: "Heat".to_string(),
            external_url: "https://letterboxd.com/film/heat-1995/".to_string(),
        }],
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json["streams"][0]["externalUrl"],
        "https://letterboxd.com/film/heat-1995/"
    );
}

#[test]
fn media_type_parsing() {
    assert_eq!("movie".parse::<MediaType>(), Ok(MediaType::Movie));
    assert_eq!("Series".parse::<MediaType>(), Ok(MediaType::Series));
    assert!("anime".parse::<MediaType>().is_err());
    assert_eq!(MediaType::default(), MediaType::Movie);
    assert_eq!(MediaType::Series.to_string(), "series");
}
