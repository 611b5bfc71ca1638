//
//  wwt-api-client
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Terminal interaction for logins.

mod prompt;

pub use prompt::TerminalLoginPrompt;
