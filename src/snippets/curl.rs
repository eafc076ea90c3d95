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

use super::DEBUG_HEADERS;

/// Escapes the characters a POSIX shell still interprets inside double quotes.
fn shell_double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// `curl -I` with the debug headers, e.g.
/// `curl -I -H "Fastly-Debug: 1" -H "Pantheon-Debug: 1" "https://example.com"`.
pub fn generate_curl_command(url: &str) -> String {
    let mut cmd = String::from("curl -I");
    for (name, value) in DEBUG_HEADERS {
        cmd.push_str(&format!(" -H \"{name}: {value}\""));
    }
    cmd.push(' ');
    cmd.push_str(&shell_double_quote(url));
    cmd
}
