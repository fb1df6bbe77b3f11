// Install URL construction

/// Tag an install file URL with the page that sent the user
///
/// # Examples
/// ```ignore
/// assert_eq!(install_url("https://a.example/f.xpi", Some("featured")), "https://a.example/f.xpi?src=featured");
/// ```
pub fn install_url(file_url: &str, src: Option<&str>) -> String {
    let Some(src) = src.filter(|s| !s.is_empty()) else {
        return file_url.to_string();
    };

    let (base, fragment) = match file_url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (file_url, None),
    };
    let (path, query) = base.split_once('?').unwrap_or((base, ""));

    let src_param = format!("src={}", urlencoding::encode(src));
    let mut params: Vec<&str> = Vec::new();
    let mut replaced = false;
    for param in query.split('&').filter(|p| !p.is_empty()) {
        if param.split('=').next() != Some("src") {
            params.push(param);
        } else if !replaced {
            params.push(&src_param);
            replaced = true;
        }
    }
    if !replaced {
        params.push(&src_param);
    }

    let mut url = format!("{}?{}", path, params.join("&"));
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
