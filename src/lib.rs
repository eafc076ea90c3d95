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

//! HTTP caching-header inspector: fetch a URL's response headers (directly or
//! through a relay), score how cacheable the resource is, explain the result
//! and emit equivalent Go, PHP and curl snippets.

pub mod config;
pub mod fetch;
pub mod headers;
pub mod inspect;
pub mod proxy;
pub mod report;
pub mod rules;
pub mod snippets;
