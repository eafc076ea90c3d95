// Copyright (C) 2025 Matías Salinas (support@fenden.com)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Equivalent command-line programs for re-running a check outside cachelens.

pub mod curl;
pub mod go;
pub mod php;

use clap::ValueEnum;
use serde::Serialize;

/// Headers every snippet sends so CDNs expose their debug headers.
pub const DEBUG_HEADERS: [(&str, &str); 2] = [("Fastly-Debug", "1"), ("Pantheon-Debug", "1")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetLanguage {
    Go,
    Php,
    Curl,
}

/// Renders the snippet for `language`.
pub fn generate(language: SnippetLanguage, url: &str) -> String {
    match language {
        SnippetLanguage::Go => go::generate_go_code(url),
        SnippetLanguage::Php => php::generate_php_code(url),
        SnippetLanguage::Curl => curl::generate_curl_command(url),
    }
}

/// Makes a URL safe to embed in a `//` or `/* */` comment.
pub(crate) fn comment_safe(url: &str) -> String {
    url.replace("*/", "*%2F")
        .replace(['\r', '\n'], "")
}

/// Fills the `{{URL}}` placeholder of a template.
pub(crate) fn render_template(template: &str, url: &str) -> String {
    template.replace("{{URL}}", &comment_safe(url))
}
