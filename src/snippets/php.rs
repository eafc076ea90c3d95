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

use super::render_template;

const PHP_TEMPLATE: &str = include_str!("templates/cachecheck.php.tmpl");

/// PHP 8.1+ script performing the same check through the curl extension.
pub fn generate_php_code(url: &str) -> String {
    render_template(PHP_TEMPLATE, url)
}
